//! Error types for credential verification and token issuance

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Failures surfaced by the authentication core.
///
/// Only the variant decides what the caller sees: authentication failures
/// become a 401 with a fixed message, everything else a 500 with a generic
/// body. Internal causes are logged, never returned.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong secret. Deliberately carries no detail.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Signing key unavailable or unusable.
    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Credential store lookup timed out")]
    StoreTimeout,

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::SigningError(_)
            | AuthError::StoreTimeout
            | AuthError::Store(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::InvalidToken => "Invalid token",
            AuthError::TokenExpired => "Token expired",
            _ => "Internal server error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}
