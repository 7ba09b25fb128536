//! Gatekeeper Server Library
//!
//! Credential verification and signed-token issuance behind a small axum
//! API. The binary in `main.rs` wires these modules to Postgres.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
