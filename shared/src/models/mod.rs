//! Data models
//!
//! Shared between the storefront server and the browser estimate (via API).
//! All timestamps are Unix millis; money is `f64` rounded to 2 places.

pub mod breakdown;
pub mod coupon;
pub mod document;
pub mod order;
pub mod rate_table;
pub mod selection;
pub mod wallet;

// Re-exports
pub use breakdown::*;
pub use coupon::*;
pub use document::*;
pub use order::*;
pub use rate_table::*;
pub use selection::*;
pub use wallet::*;
