//! Coupon API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /coupon/validate | POST | none |
//! | /coupon | POST | staff |

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new().route("/coupon/validate", post(handler::validate));

    let manage_routes = Router::new()
        .route("/coupon", post(handler::upsert))
        .layer(middleware::from_fn(require_staff));

    public_routes.merge(manage_routes)
}
