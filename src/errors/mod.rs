//! Centralized error handling for the emoji kitchen proxy
//!
//! Errors are grouped by the layer that produces them:
//!
//! - **Store Errors**: key-value store reads and writes
//! - **Fetch Errors**: pulling the combination dataset from upstream
//! - **App Errors**: the top-level type handlers return
//!
//! Lookup misses and malformed emoji parameters are not errors. Handlers
//! answer those with a plain `404 Not Found`.
//!
//! # Usage
//!
//! ```rust
//! use emoji_kitchen_proxy::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("missing dataset url"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for key-value store Results
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for upstream fetch Results
pub type FetchResult<T> = Result<T, FetchError>;
