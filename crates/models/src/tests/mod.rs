
/// CRUD operations tests for the product table
pub mod crud_tests;
