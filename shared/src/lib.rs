//! Shared types for the print storefront
//!
//! The pricing core lives here so that the customer-facing estimate and the
//! server-side reconciliation call the very same functions:
//!
//! - [`models`]: rate table, print selection, coupon, wallet and order records
//! - [`pricing`]: page accounting, charges, weight, delivery tiers, discounts
//! - [`error`]: unified error codes and the JSON response envelope
//!
//! Nothing in this crate performs I/O or reads the clock; callers pass `now`.

pub mod error;
pub mod models;
pub mod pricing;
pub mod types;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use pricing::{PolicyRejection, PricingError, PricingResult};
