//! Login and token introspection handlers

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;
use validator::Validate;

use crate::auth::{AuthError, AuthService};
use crate::middleware::AuthenticatedUser;
use crate::models::{LoginRequest, LoginResponse, WhoAmIResponse};

/// Exchange credentials for a signed token.
///
/// Every client-side failure, including a malformed body, answers with the
/// same 401 so callers learn nothing about which part was wrong.
pub async fn login(
    State(auth_service): State<Arc<AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "malformed login request");
        AuthError::InvalidCredentials
    })?;

    if let Err(e) = request.validate() {
        debug!(error = %e, "login request failed validation");
        return Err(AuthError::InvalidCredentials);
    }

    let token = auth_service
        .login(&request.identifier, &request.secret)
        .await?;

    Ok(Json(LoginResponse {
        token: token.into_string(),
    }))
}

/// Report the identity carried by the caller's bearer token
pub async fn whoami(user: AuthenticatedUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        subject: user.subject().clone(),
        expires_at: user.claims.expires_at(),
    })
}
