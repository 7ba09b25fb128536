//! Credential verification against the credential store

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error};

use super::error::AuthError;
use super::password::{hash_secret, is_hashable, verify_secret, PasswordError};
use crate::models::Subject;
use crate::store::CredentialStore;

/// Checks identifier/secret pairs against stored bcrypt hashes.
///
/// Unknown identifiers and wrong secrets produce the same error and cost the
/// same bcrypt work: a lookup miss is verified against `dummy_hash`.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    lookup_timeout: Duration,
    dummy_hash: Arc<str>,
}

impl CredentialVerifier {
    /// `bcrypt_cost` should match the cost of stored hashes so misses and
    /// mismatches take the same time.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        lookup_timeout: Duration,
        bcrypt_cost: u32,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hash_secret("gatekeeper-unknown-identifier", bcrypt_cost)?;

        Ok(Self {
            store,
            lookup_timeout,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Verify a presented identifier/secret pair
    pub async fn verify(&self, identifier: &str, secret: &str) -> Result<Subject, AuthError> {
        if identifier.trim().is_empty() || secret.is_empty() || !is_hashable(secret) {
            return Err(AuthError::InvalidCredentials);
        }

        let record = timeout(self.lookup_timeout, self.store.find_by_identifier(identifier))
            .await
            .map_err(|_| {
                error!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "credential lookup timed out"
                );
                AuthError::StoreTimeout
            })??;

        let (stored_hash, known) = match &record {
            Some(record) => (Arc::from(record.secret_hash.as_str()), true),
            None => (Arc::clone(&self.dummy_hash), false),
        };

        let secret = secret.to_owned();
        let matches = tokio::task::spawn_blocking(move || verify_secret(&secret, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("secret verification task failed: {}", e)))?;

        if known && matches {
            Ok(Subject::new(identifier))
        } else {
            debug!(known, "credential verification failed");
            Err(AuthError::InvalidCredentials)
        }
    }
}
