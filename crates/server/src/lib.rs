pub mod errors;
pub mod openapi;
pub mod product;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
