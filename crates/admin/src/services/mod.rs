//! External services used by the admin client.
//!
//! # Services
//!
//! - `products` - Product API client (categories, product listing, product creation)

pub mod products;

pub use products::{HttpProductService, Product, ProductService, ProductServiceError};
