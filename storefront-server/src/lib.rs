//! Storefront Server - print shop order pricing and reconciliation
//!
//! # Overview
//!
//! The browser shows an estimate computed from the published rate table;
//! this server re-derives every charge from the uploaded documents and its
//! own stored state before an order is accepted.
//!
//! - **Documents** (`documents`): page detection from the uploaded bytes
//! - **Store** (`store`): embedded redb for rate table, coupons, wallets, orders
//! - **Orders** (`orders`): the reconciler, pricing via `shared::pricing`
//! - **HTTP API** (`api`): axum routes
//!
//! # Module layout
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # config, state, server, startup errors
//! ├── auth/          # gateway headers, staff gate
//! ├── api/           # HTTP routes and handlers
//! ├── documents/     # inspection and file storage
//! ├── orders/        # OrderReconciler
//! ├── store/         # redb tables
//! └── utils/         # logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod documents;
pub mod orders;
pub mod store;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderReconciler};
pub use store::{Store, StoreError};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - accepts tracing field values
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, then start logging from the resulting configuration
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
   ___      _      _
  / _ \_ __(_)_ __| |_
 / /_)/ '__| | '_ \ __|
/ ___/| |  | | | | | |_
\/    |_|  |_|_| |_|\__|
    storefront server
    "#
    );
}
