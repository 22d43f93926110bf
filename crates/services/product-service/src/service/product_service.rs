//! Product service - Handles catalog business logic.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::{NewProduct, Paginated, PaginationParams, Product, ProductPatch};

use crate::repository::ProductRepository;

/// Product service trait for dependency injection.
///
/// All operations only see available products. Logical deletion removes a
/// product from this surface without touching the stored row, and there is no
/// operation that brings one back.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Create a new product (available by default)
    async fn create_product(&self, input: NewProduct) -> AppResult<Product>;

    /// List available products, paginated
    async fn list_products(&self, params: PaginationParams) -> AppResult<Paginated<Product>>;

    /// Get an available product by id
    async fn get_product(&self, id: i32) -> AppResult<Product>;

    /// Apply a partial update to an available product
    async fn update_product(&self, id: i32, patch: ProductPatch) -> AppResult<Product>;

    /// Logically delete a product; returns the now unavailable record
    async fn remove_product(&self, id: i32) -> AppResult<Product>;

    /// Check that every id maps to an existing, available product
    async fn validate_products(&self, ids: Vec<i32>) -> AppResult<Vec<Product>>;
}

/// Concrete implementation of ProductService using repository.
pub struct ProductCatalog {
    repo: Arc<dyn ProductRepository>,
}

impl ProductCatalog {
    /// Create new service instance with repository
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ProductService for ProductCatalog {
    async fn create_product(&self, input: NewProduct) -> AppResult<Product> {
        self.repo.create(input.name, input.price).await
    }

    async fn list_products(&self, params: PaginationParams) -> AppResult<Paginated<Product>> {
        let limit = params.limit();

        let total = self.repo.count_available().await?;
        let data = self.repo.find_page(params.offset(), limit).await?;

        Ok(Paginated::new(data, params.page, limit, total))
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Product with id {} not found", id))
    }

    async fn update_product(&self, id: i32, patch: ProductPatch) -> AppResult<Product> {
        // Visibility check first; an invisible product is never written.
        // The check and the write are separate statements, not one
        // transaction; the repository re-applies the predicate on write.
        self.get_product(id).await?;

        self.repo.update(id, patch.name, patch.price).await
    }

    async fn remove_product(&self, id: i32) -> AppResult<Product> {
        self.get_product(id).await?;

        self.repo.mark_unavailable(id).await
    }

    async fn validate_products(&self, ids: Vec<i32>) -> AppResult<Vec<Product>> {
        // Duplicate-insensitive: collapse into a sorted set before fetching
        let unique: Vec<i32> = ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let products = self.repo.find_by_ids(&unique).await?;

        // All-or-nothing; missing ids are not reported individually
        if products.len() != unique.len() {
            return Err(AppError::not_found("Some products were not found"));
        }

        Ok(products)
    }
}
