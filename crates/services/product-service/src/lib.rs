//! Product Service Library
//!
//! This crate provides product catalog management via gRPC: CRUD with
//! logical deletion, paginated listing and batch id validation.

pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::config::ProductServiceConfig;
use crate::grpc::ProductGrpcService;
use crate::infra::Database;
use crate::repository::ProductStore;
use crate::service::ProductCatalog;

/// Run the gRPC server.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProductServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProductServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: ProductServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database_url).await?;
    let db_conn = db.get_connection();

    // Create repository and service
    let product_repo = Arc::new(ProductStore::new(db_conn));
    let product_service = Arc::new(ProductCatalog::new(product_repo));

    // Create gRPC service
    let grpc_service = ProductGrpcService::new(product_service);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Product service listening on {}", addr);

    // Run server
    Server::builder()
        .add_service(proto::ProductServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
