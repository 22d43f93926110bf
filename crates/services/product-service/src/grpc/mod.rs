//! gRPC surface for the product catalog.

mod product_grpc;

pub use product_grpc::ProductGrpcService;
