//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness and store check
//! - [`pricing`] - rate table and advisory estimate
//! - [`order`] - order placement, lookup and staff edits
//! - [`coupon`] - coupon preview and staff upsert
//! - [`wallet`] - balance and staff top-up
//!
//! JSON bodies go through [`extract::AppJson`]. Every response uses the `ApiResponse` envelope from `shared`.

pub mod coupon;
pub mod extract;
pub mod health;
pub mod order;
pub mod pricing;
pub mod wallet;

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::core::ServerState;

/// HTTP request logging middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(
        target: "http_access",
        elapsed_ms = started.elapsed().as_millis() as u64,
        "{} {} {}",
        method,
        uri,
        status
    );

    response
}

/// Every resource router, without state
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(pricing::router())
        .merge(order::router())
        .merge(coupon::router())
        .merge(wallet::router())
}

/// The full application with state and middleware applied
pub fn build_app(state: &ServerState) -> Router {
    let timeout = state.config.request_timeout();

    routes()
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(state.config.order_body_limit()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
}
