//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC service definition for
//! ProductService: product catalog management (CRUD, logical delete,
//! pagination, batch validation).

/// Product catalog service definitions.
pub mod product {
    tonic::include_proto!("product");
}

// Re-export commonly used items
pub use product::product_service_client::ProductServiceClient;
pub use product::product_service_server::{ProductService, ProductServiceServer};
