//! Product repository implementation with logical delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::{AppError, AppResult};
use domain::Product;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
///
/// Every method only surfaces available products; a row whose `available`
/// flag is false is invisible here and stays in storage indefinitely.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Count available products
    async fn count_available(&self) -> AppResult<u64>;

    /// Fetch a page of available products ordered by id
    async fn find_page(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>>;

    /// Find an available product by id
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Find all available products whose id is in the given set
    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Product>>;

    /// Create a new product (available by default)
    async fn create(&self, name: String, price: f64) -> AppResult<Product>;

    /// Update product fields; the write is conditioned on visibility
    async fn update(&self, id: i32, name: Option<String>, price: Option<f64>)
        -> AppResult<Product>;

    /// Logical delete: flip `available` to false, keep the row
    async fn mark_unavailable(&self, id: i32) -> AppResult<Product>;
}

/// Concrete implementation of ProductRepository backed by SeaORM
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn count_available(&self) -> AppResult<u64> {
        let total = ProductEntity::find()
            .filter(product::Column::Available.eq(true))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(total)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::Available.eq(true))
            .order_by_asc(product::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .filter(product::Column::Available.eq(true))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .filter(product::Column::Available.eq(true))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, name: String, price: f64) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(name),
            price: Set(price),
            available: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(
        &self,
        id: i32,
        name: Option<String>,
        price: Option<f64>,
    ) -> AppResult<Product> {
        // Only visible products can be written
        let model = ProductEntity::find_by_id(id)
            .filter(product::Column::Available.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product with id {} not found", id)))?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(price) = price {
            active.price = Set(price);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn mark_unavailable(&self, id: i32) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .filter(product::Column::Available.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product with id {} not found", id)))?;

        let mut active: ActiveModel = model.into();
        active.available = Set(false);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }
}
