//! Token issuance and validation
//!
//! Tokens are compact HS256 JWS strings (`header.payload.signature`). They
//! carry their own expiry, so validating one needs only the signing key.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use super::error::AuthError;
use crate::models::Subject;

/// Shortest HMAC key accepted for signing, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claim set signed into every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (authenticated identifier)
    pub sub: Subject,
    /// Expiration, seconds since the epoch
    pub exp: i64,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Token ID
    pub jti: String,
}

impl Claims {
    pub fn subject(&self) -> &Subject {
        &self.sub
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// An issued token together with its expiry
#[derive(Debug, Clone)]
pub struct SignedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn into_string(self) -> String {
        self.token
    }
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Mints and checks signed tokens with a key fixed at construction.
///
/// A missing or short key does not prevent construction; every `issue`
/// and `validate` call fails with [`AuthError::SigningError`] instead.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Result<SigningKeys, String>,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let keys = if secret.is_empty() {
            Err("signing key is not configured".to_string())
        } else if secret.len() < MIN_SECRET_LEN {
            Err(format!(
                "signing key is {} bytes, at least {} required",
                secret.len(),
                MIN_SECRET_LEN
            ))
        } else {
            Ok(SigningKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            })
        };

        Self { keys, default_ttl }
    }

    /// Whether the signing key is usable
    pub fn is_ready(&self) -> bool {
        self.keys.is_ok()
    }

    /// Reason the issuer cannot sign, if any
    pub fn misconfiguration(&self) -> Option<&str> {
        self.keys.as_ref().err().map(String::as_str)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` valid for the default TTL
    pub fn issue_default(&self, subject: &Subject) -> Result<SignedToken, AuthError> {
        self.issue(subject, self.default_ttl)
    }

    /// Issue a token for `subject` expiring `ttl` from now
    pub fn issue(&self, subject: &Subject, ttl: Duration) -> Result<SignedToken, AuthError> {
        if ttl <= Duration::zero() {
            return Err(AuthError::SigningError(format!(
                "token ttl must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: subject.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.sign(&claims)?;
        debug!(subject = %subject, exp = claims.exp, "issued token");

        Ok(SignedToken { token, expires_at })
    }

    /// Decode a token, checking signature and then expiry.
    ///
    /// A bad signature is `InvalidToken` whatever the expiry; only a correctly
    /// signed token can come back as `TokenExpired`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys()?;

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        decode::<Claims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!(error = %e, "token rejected");
                    AuthError::InvalidToken
                }
            })
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let keys = self.keys()?;

        encode(&Header::new(ALGORITHM), claims, &keys.encoding).map_err(|e| {
            error!(error = %e, "token encoding failed");
            AuthError::SigningError(format!("token encoding failed: {}", e))
        })
    }

    fn keys(&self) -> Result<&SigningKeys, AuthError> {
        self.keys
            .as_ref()
            .map_err(|reason| AuthError::SigningError(reason.clone()))
    }
}
