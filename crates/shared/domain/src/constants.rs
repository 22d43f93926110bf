//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Pagination
// =============================================================================

/// Page number used when a listing request does not specify one
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Page size used when a listing request does not specify one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound applied to any requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

// =============================================================================
// Validation
// =============================================================================

/// Minimum product name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Lowest accepted product price
pub const MIN_PRICE: f64 = 0.0;
