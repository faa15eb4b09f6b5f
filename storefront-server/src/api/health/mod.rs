//! Health check route
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |
//!
//! ```json
//! { "success": true, "status": "healthy", "version": "0.1.0", "database": "ok" }
//! ```

use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use shared::ApiResponse;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// ok | error
    database: &'static str,
}

pub async fn health(State(state): State<ServerState>) -> ApiResponse<HealthResponse> {
    let database = match state.store.ping() {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check: store unavailable");
            "error"
        }
    };

    ApiResponse::success(HealthResponse {
        status: if database == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
