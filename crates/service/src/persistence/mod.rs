//! Persistence layer: a change-tracking unit of work that stamps audit
//! columns on commit, and a generic repository built on top of it.
//!
//! ```text
//! DbContext (connection + acting principal, one per request)
//!   └── SeaOrmRepository<A>      CRUD, bulk CRUD, paging
//!         └── UnitOfWork<A>      staged entries, commit with audit stamping
//! ```

pub mod context;
pub mod errors;
pub mod repository;
pub mod unit_of_work;

pub use context::DbContext;
pub use errors::{RepositoryError, RepositoryResult};
pub use repository::{Repository, SeaOrmRepository};
pub use unit_of_work::{Entry, EntryState, UnitOfWork};
