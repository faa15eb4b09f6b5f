//! Wallet API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /wallet | GET | customer (own ledger) |
//! | /wallet/balance | GET | customer |
//! | /wallet/credit | POST | staff |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/wallet", get(handler::get_wallet))
        .route("/wallet/balance", get(handler::balance));

    let staff_routes = Router::new()
        .route("/wallet/credit", post(handler::credit))
        .layer(middleware::from_fn(require_staff));

    customer_routes.merge(staff_routes)
}
