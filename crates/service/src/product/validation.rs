use models::errors::ModelError;
use models::product;

use super::dto::CreateProductRequest;

/// Input validation producing human-readable messages. Empty means valid.
pub trait Validator<T> {
    fn validate(&self, input: &T) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CreateProductValidator;

impl Validator<CreateProductRequest> for CreateProductValidator {
    fn validate(&self, input: &CreateProductRequest) -> Vec<String> {
        let mut errors = Vec::new();
        if let Err(ModelError::Validation(msg)) = product::validate_id(input.id) {
            errors.push(msg);
        }
        errors
    }
}
