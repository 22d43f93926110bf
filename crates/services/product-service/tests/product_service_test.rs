//! Product catalog service tests.
//!
//! These tests drive the service and gRPC layers against an in-memory
//! repository, so no database connection is required.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tonic::Request;

use common::{AppError, AppResult, ErrorBody};
use domain::{NewProduct, PaginationParams, Product, ProductPatch};
use product_service_lib::grpc::ProductGrpcService;
use product_service_lib::repository::ProductRepository;
use product_service_lib::service::{ProductCatalog, ProductService};
use proto::product::product_service_server::ProductService as ProductServiceProto;
use proto::product::{
    CreateProductRequest, FindAllProductsRequest, FindOneProductRequest, UpdateProductRequest,
};

// =============================================================================
// In-memory repository
// =============================================================================

/// In-memory repository mirroring the store contract: rows are never removed,
/// identifiers are assigned sequentially and never reused.
#[derive(Default)]
struct InMemoryRepo {
    rows: Mutex<Vec<Product>>,
}

impl InMemoryRepo {
    fn new() -> Self {
        Self::default()
    }

    /// Number of rows physically present, available or not.
    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn row(&self, id: i32) -> Option<Product> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepo {
    async fn count_available(&self) -> AppResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.available)
            .count() as u64)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.available)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.available)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.available && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, name: String, price: f64) -> AppResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let product = Product {
            id: rows.len() as i32 + 1,
            name,
            price,
            available: true,
            created_at: now,
            updated_at: now,
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: i32,
        name: Option<String>,
        price: Option<f64>,
    ) -> AppResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.available)
            .ok_or_else(|| AppError::not_found(format!("Product with id {} not found", id)))?;

        if let Some(name) = name {
            row.name = name;
        }
        if let Some(price) = price {
            row.price = price;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn mark_unavailable(&self, id: i32) -> AppResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.available)
            .ok_or_else(|| AppError::not_found(format!("Product with id {} not found", id)))?;

        row.available = false;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

fn new_product(name: &str, price: f64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
    }
}

// =============================================================================
// Service layer
// =============================================================================

#[tokio::test]
async fn test_create_then_list_scenario() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);

    let created = service.create_product(new_product("Pen", 1.5)).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Pen");
    assert_eq!(created.price, 1.5);
    assert!(created.available);

    let page = service
        .list_products(PaginationParams { page: 1, limit: 10 })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, 1);
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.last_page, 1);
}

#[tokio::test]
async fn test_created_ids_are_fresh_and_sequential() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);

    let first = service.create_product(new_product("Pen", 1.5)).await.unwrap();
    let second = service.create_product(new_product("Pad", 3.0)).await.unwrap();

    assert_ne!(first.id, second.id);
    assert!(second.available);
}

#[tokio::test]
async fn test_update_changes_fields_but_not_id_or_availability() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    service.create_product(new_product("Pen", 1.5)).await.unwrap();

    let patch = ProductPatch {
        name: None,
        price: Some(2.0),
    };
    let updated = service.update_product(1, patch).await.unwrap();

    assert_eq!(updated.id, 1);
    assert_eq!(updated.name, "Pen");
    assert_eq!(updated.price, 2.0);
    assert!(updated.available);
}

#[tokio::test]
async fn test_get_product_missing_names_the_id() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);

    let err = service.get_product(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg.contains("999")));
}

#[tokio::test]
async fn test_remove_is_logical_and_terminal() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo.clone());
    service.create_product(new_product("Pen", 1.5)).await.unwrap();

    let removed = service.remove_product(1).await.unwrap();
    assert!(!removed.available);

    // Invisible to the normal lookup path afterwards
    assert!(matches!(
        service.get_product(1).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    // A second removal is not a second success
    assert!(matches!(
        service.remove_product(1).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    // The row itself is still in storage, flagged unavailable
    assert_eq!(repo.row_count(), 1);
    assert!(!repo.row(1).unwrap().available);
}

#[tokio::test]
async fn test_update_after_remove_fails() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    service.create_product(new_product("Pen", 1.5)).await.unwrap();
    service.remove_product(1).await.unwrap();

    let patch = ProductPatch {
        name: Some("Pencil".to_string()),
        price: None,
    };
    let err = service.update_product(1, patch).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_pagination_invariants() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    for i in 0..5 {
        service
            .create_product(new_product(&format!("Item {}", i), i as f64))
            .await
            .unwrap();
    }

    let limit = 2;
    let mut seen = 0;
    for page in 1..=3 {
        let result = service
            .list_products(PaginationParams { page, limit })
            .await
            .unwrap();
        assert!(result.data.len() as u64 <= limit);
        assert_eq!(result.meta.total, 5);
        assert_eq!(result.meta.last_page, 3);
        seen += result.data.len();
    }
    assert_eq!(seen, 5);

    // A page past the end is empty, not an error
    let past = service
        .list_products(PaginationParams { page: 9, limit })
        .await
        .unwrap();
    assert!(past.data.is_empty());
    assert_eq!(past.meta.last_page, 3);
}

#[tokio::test]
async fn test_listing_skips_unavailable_products() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    for name in ["Pen", "Pad", "Ink"] {
        service.create_product(new_product(name, 1.0)).await.unwrap();
    }
    service.remove_product(2).await.unwrap();

    let page = service
        .list_products(PaginationParams { page: 1, limit: 10 })
        .await
        .unwrap();
    assert_eq!(page.meta.total, 2);
    assert!(page.data.iter().all(|p| p.id != 2));
}

#[tokio::test]
async fn test_empty_store_listing() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);

    let page = service
        .list_products(PaginationParams { page: 1, limit: 10 })
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 0);
    assert_eq!(page.meta.last_page, 0);
}

#[tokio::test]
async fn test_validate_products_is_duplicate_insensitive() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    service.create_product(new_product("Pen", 1.5)).await.unwrap();
    service.create_product(new_product("Pad", 3.0)).await.unwrap();

    let with_dupes = service.validate_products(vec![1, 1, 2]).await.unwrap();
    let without = service.validate_products(vec![1, 2]).await.unwrap();

    assert_eq!(with_dupes.len(), 2);
    assert_eq!(without.len(), 2);
}

#[tokio::test]
async fn test_validate_products_fails_on_removed_product() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    service.create_product(new_product("Pen", 1.5)).await.unwrap();
    service.create_product(new_product("Pad", 3.0)).await.unwrap();
    service.remove_product(2).await.unwrap();

    let err = service.validate_products(vec![1, 2]).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_validate_products_fails_on_unknown_id() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);
    service.create_product(new_product("Pen", 1.5)).await.unwrap();

    let err = service.validate_products(vec![1, 42]).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_validate_products_empty_input() {
    let repo = Arc::new(InMemoryRepo::new());
    let service = ProductCatalog::new(repo);

    let result = service.validate_products(vec![]).await.unwrap();
    assert!(result.is_empty());
}

// =============================================================================
// gRPC boundary
// =============================================================================

fn grpc_service() -> ProductGrpcService {
    let repo = Arc::new(InMemoryRepo::new());
    let service = Arc::new(ProductCatalog::new(repo));
    ProductGrpcService::new(service)
}

#[tokio::test]
async fn test_grpc_create_and_fetch() {
    let grpc = grpc_service();

    let created = grpc
        .create_product(Request::new(CreateProductRequest {
            name: "Pen".to_string(),
            price: 1.5,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(created.id, 1);
    assert!(created.available);

    let fetched = grpc
        .find_one_product(Request::new(FindOneProductRequest { id: 1 }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched.name, "Pen");
}

#[tokio::test]
async fn test_grpc_rejects_empty_name() {
    let grpc = grpc_service();

    let status = grpc
        .create_product(Request::new(CreateProductRequest {
            name: "  ".to_string(),
            price: 1.0,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn test_grpc_rejects_negative_price() {
    let grpc = grpc_service();

    let status = grpc
        .update_product(Request::new(UpdateProductRequest {
            id: 1,
            name: None,
            price: Some(-1.0),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn test_grpc_rejects_non_positive_id() {
    let grpc = grpc_service();

    let status = grpc
        .find_one_product(Request::new(FindOneProductRequest { id: 0 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn test_grpc_not_found_carries_structured_payload() {
    let grpc = grpc_service();

    let status = grpc
        .find_one_product(Request::new(FindOneProductRequest { id: 42 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);
    assert!(status.message().contains("42"));

    let body: ErrorBody = serde_json::from_slice(status.details()).unwrap();
    assert_eq!(body.status, 404);
    assert!(body.message.contains("42"));
}

#[tokio::test]
async fn test_grpc_pagination_defaults_and_meta() {
    let grpc = grpc_service();
    for i in 0..3 {
        grpc.create_product(Request::new(CreateProductRequest {
            name: format!("Item {}", i),
            price: 1.0,
        }))
        .await
        .unwrap();
    }

    // Absent page/limit fall back to the defaults
    let listed = grpc
        .find_all_products(Request::new(FindAllProductsRequest {
            page: None,
            limit: None,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.data.len(), 3);

    let meta = listed.meta.unwrap();
    assert_eq!(meta.total, 3);
    assert_eq!(meta.page, 1);
    assert_eq!(meta.last_page, 1);

    // Zero is rejected rather than resolved
    let status = grpc
        .find_all_products(Request::new(FindAllProductsRequest {
            page: Some(0),
            limit: None,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}
