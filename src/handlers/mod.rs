//! API handlers for the gatekeeper server

pub mod auth;

pub use auth::{login, whoami};

pub async fn root() -> &'static str {
    "Gatekeeper API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}
