use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by repository and unit-of-work operations.
///
/// Absence of a record is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A mutating call received no entity (or no sequence of entities).
    #[error("argument missing: {0}")]
    ArgumentMissing(&'static str),
    /// The store refused the commit; staged additions and modifications were reverted.
    #[error("commit conflict: {0}")]
    CommitConflict(String),
    /// Two entities staged for insertion share a primary key.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("database error: {0}")]
    Db(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DbErr> for RepositoryError {
    fn from(e: DbErr) -> Self { Self::Db(e.to_string()) }
}
