//! Product domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_NAME_LENGTH, MIN_PRICE};
use crate::error::{DomainError, DomainResult};

/// Product domain entity.
///
/// A product is never physically deleted; removal flips `available` to false
/// and the row stays in storage. Read paths only surface available products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier, immutable after creation
    pub id: i32,
    pub name: String,
    pub price: f64,
    /// Visibility flag (true = visible, false = logically deleted)
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product creation data transfer object.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Product display name
    pub name: String,
    /// Unit price, non-negative
    pub price: f64,
}

impl NewProduct {
    /// Validate field-level rules before the service is invoked.
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Product update data transfer object.
///
/// The identifier is intentionally absent: an inbound id can never reach the
/// persisted patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    /// New display name
    pub name: Option<String>,
    /// New unit price
    pub price: Option<f64>,
}

impl ProductPatch {
    /// Validate whichever fields are present.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().len() < MIN_NAME_LENGTH {
        return Err(DomainError::validation("Product name must not be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < MIN_PRICE {
        return Err(DomainError::validation(
            "Product price must be a non-negative number",
        ));
    }
    Ok(())
}
