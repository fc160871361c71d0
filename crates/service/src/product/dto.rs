use models::product;
use serde::{Deserialize, Serialize};

use crate::response::PagedRequest;

/// Listing request for products.
pub type ProductRequest = PagedRequest;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl From<product::Model> for ProductDto {
    fn from(m: product::Model) -> Self {
        Self { id: m.id, name: m.name, description: m.description, price: m.price }
    }
}

/// Missing fields deserialize to their empty values so validation can report them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
}

impl CreateProductRequest {
    pub fn into_model(self) -> product::Model {
        let model = product::Model::new(self.id, self.name, self.price);
        match self.description {
            Some(d) => model.with_description(d),
            None => model,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    /// Copy the provided fields onto `model`.
    pub fn apply(self, model: &mut product::Model) {
        if let Some(name) = self.name {
            model.name = name;
        }
        if let Some(description) = self.description {
            model.description = Some(description);
        }
        if let Some(price) = self.price {
            model.price = price;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductRequest {
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_drops_audit_columns() {
        let dto = ProductDto::from(product::Model::new(3, "Mug", 4.5).with_description("white"));
        assert_eq!(dto, ProductDto { id: 3, name: "Mug".into(), description: Some("white".into()), price: 4.5 });
    }

    #[test]
    fn missing_create_fields_default_to_empty() {
        let request: CreateProductRequest = serde_json::from_str(r#"{"name":"Mug"}"#).unwrap();
        assert_eq!(request.id, 0);
        assert_eq!(request.price, 0.0);
        let model = request.into_model();
        assert_eq!(model.name, "Mug");
        assert!(model.created_at.is_none());
    }

    #[test]
    fn update_applies_only_given_fields() {
        let mut model = product::Model::new(1, "Mug", 4.5);
        UpdateProductRequest { price: Some(5.0), ..Default::default() }.apply(&mut model);
        assert_eq!(model.name, "Mug");
        assert_eq!(model.price, 5.0);
    }
}
