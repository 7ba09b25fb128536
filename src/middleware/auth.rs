//! Bearer-token extractor

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::auth::{AuthError, AuthService, Claims};
use crate::models::Subject;

/// Caller identity proven by a valid `Authorization: Bearer` token.
///
/// Rejects with 401 when the header is missing, malformed, forged or
/// expired.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn subject(&self) -> &Subject {
        self.claims.subject()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthError::InvalidToken)?;

        let service = Arc::<AuthService>::from_ref(state);
        let claims = service.authenticate(bearer.token())?;

        Ok(Self { claims })
    }
}
