//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::Method,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /checkout     - Create checkout session (other methods: 405)
/// - POST /api/checkout - Same handler, at the path storefronts on
///   serverless hosts already call
/// - GET  /health       - Health check
pub fn create_router(state: AppState) -> Router {
    // Storefronts on any origin may post carts
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/checkout", any(handlers::create_checkout))
        .route("/api/checkout", any(handlers::create_checkout))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
