//! Route definitions for the gatekeeper API

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::*;
use crate::middleware::request_tracing;

// Auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(whoami))
}

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .layer(request_tracing())
        .with_state(state)
}
