//! Pricing API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /pricing | GET | none |
//! | /pricing | PUT | staff |
//! | /pricing/estimate | POST | none (wallet needs `x-user-id`) |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub use handler::{PricingView, RateRules};

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/pricing", get(handler::get_pricing))
        .route("/pricing/estimate", post(handler::estimate));

    let manage_routes = Router::new()
        .route("/pricing", put(handler::update_pricing))
        .layer(middleware::from_fn(require_staff));

    public_routes.merge(manage_routes)
}
