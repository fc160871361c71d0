//! Domain layer: persisted records, the audit capability and database connectivity.

pub mod audit;
pub mod errors;
pub mod db;
pub mod product;

#[cfg(test)]
mod tests;
