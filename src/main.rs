//! Gatekeeper Server
//!
//! Authenticates users against the credential store and issues signed,
//! time-bounded tokens.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gatekeeper_server::app_state::AppState;
use gatekeeper_server::auth::{AuthService, CredentialVerifier, TokenIssuer};
use gatekeeper_server::config::AppConfig;
use gatekeeper_server::routes;
use gatekeeper_server::store::PgCredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(?config, "configuration loaded");

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.store_timeout)
        .connect_lazy(config.require_database_url()?)
        .context("Invalid DATABASE_URL")?;

    let issuer = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
    if let Some(reason) = issuer.misconfiguration() {
        // Keep serving; logins answer 500 until the key is fixed.
        error!(reason, "token signing is unavailable");
    }

    let verifier = CredentialVerifier::new(
        Arc::new(PgCredentialStore::new(db_pool)),
        config.store_timeout,
        config.bcrypt_cost,
    )
    .context("Failed to prepare credential verifier")?;

    let state = AppState::new(Arc::new(AuthService::new(verifier, issuer)));
    let app = routes::app(state);

    info!("Server starting on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
