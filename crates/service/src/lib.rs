//! Application and infrastructure layer on top of `models`.
//! - `persistence`: generic repository over an audit-stamping unit of work.
//! - `product`: product use cases returning response envelopes.
//! - `mail` and `cache`: collaborator abstractions with their default backends.

pub mod cache;
pub mod errors;
pub mod mail;
pub mod pagination;
pub mod persistence;
pub mod product;
pub mod response;
#[cfg(test)]
pub mod test_support;
