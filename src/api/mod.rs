//! HTTP API server

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/create", post(handlers::create))
        .route("/search", get(handlers::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
