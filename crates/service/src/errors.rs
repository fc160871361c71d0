use thiserror::Error;

use crate::persistence::RepositoryError;

/// Messages are written to response envelopes as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
