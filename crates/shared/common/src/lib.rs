//! Common utilities shared across the workspace.
//!
//! This crate provides unified error handling for the gRPC surface and the
//! service/repository layers behind it.

pub mod error;

pub use error::{AppError, AppResult, ErrorBody, OptionExt};
