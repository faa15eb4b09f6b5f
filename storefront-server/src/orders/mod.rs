//! Print orders
//!
//! - **reconciler**: authoritative pricing, placement and staff edits
//! - **error**: order-level failures and their API mapping
//!
//! # Architecture
//!
//! ```text
//! Handler → OrderReconciler → price_order (shared) → Store (redb)
//!                 │                                     │
//!          read snapshot ──────────────────────── write transaction
//! ```
//!
//! Pricing always happens on one snapshot of the rate table, coupon and
//! wallet. Everything the order changes is committed in a single write
//! transaction.

mod error;
mod reconciler;

pub use error::{OrderError, OrderResult};
pub use reconciler::{OrderReconciler, PricedOrder, Reconciled};
