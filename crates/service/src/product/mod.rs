//! Product application service.
//!
//! The operations return envelopes and validate their input; reads and writes
//! beyond the catalog load are left to consumers of this crate.

pub mod dto;
pub mod service;
pub mod validation;

pub use dto::{CreateProductRequest, DeleteProductRequest, ProductDto, ProductRequest, UpdateProductRequest};
pub use service::{ProductRepository, ProductService};
pub use validation::{CreateProductValidator, Validator};
