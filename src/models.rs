//! Data models for the gatekeeper server

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored credential row.
///
/// `secret_hash` is a bcrypt hash; plaintext secrets are never stored or
/// queried.
#[derive(Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub identifier: String,
    pub secret_hash: String,
}

impl CredentialRecord {
    pub fn new(identifier: impl Into<String>, secret_hash: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret_hash: secret_hash.into(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identifier", &self.identifier)
            .field("secret_hash", &"<redacted>")
            .finish()
    }
}

/// Identity asserted by a token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login request body
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(rename = "user_name")]
    #[validate(length(min = 1, max = 256))]
    pub identifier: String,
    #[serde(rename = "password")]
    #[validate(length(min = 1, max = 72))]
    pub secret: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Identity of the bearer of a valid token
#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub subject: Subject,
    pub expires_at: DateTime<Utc>,
}
