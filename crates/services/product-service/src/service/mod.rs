//! Service layer - catalog business rules.

mod product_service;

pub use product_service::{ProductCatalog, ProductService};
