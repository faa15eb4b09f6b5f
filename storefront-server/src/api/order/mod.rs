//! Order API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /order | GET | customer (own orders) |
//! | /order/print | POST | customer, multipart `files[]` + `data` |
//! | /order/{orderId} | GET | owner or staff |
//! | /order/edit/{orderId} | POST | staff |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/order", get(handler::list))
        .route("/order/print", post(handler::place))
        .route("/order/{order_id}", get(handler::get_by_id));

    let staff_routes = Router::new()
        .route("/order/edit/{order_id}", post(handler::edit))
        .layer(middleware::from_fn(require_staff));

    customer_routes.merge(staff_routes)
}
