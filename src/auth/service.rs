//! Authentication service composing verification and issuance

use tracing::{info, warn};

use super::error::AuthError;
use super::jwt::{Claims, SignedToken, TokenIssuer};
use super::verifier::CredentialVerifier;

/// Entry point for handlers: verify credentials, then mint a token.
///
/// Holds no mutable state; cloning shares the same store handle and key.
#[derive(Clone)]
pub struct AuthService {
    verifier: CredentialVerifier,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(verifier: CredentialVerifier, issuer: TokenIssuer) -> Self {
        Self { verifier, issuer }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Authenticate a credential pair and issue a token with the default TTL.
    ///
    /// `Ok` is the authenticated outcome, `Err(InvalidCredentials)` the
    /// rejected one; any other error is a server-side failure.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<SignedToken, AuthError> {
        let subject = match self.verifier.verify(identifier, secret).await {
            Ok(subject) => subject,
            Err(e) => {
                if matches!(e, AuthError::InvalidCredentials) {
                    warn!(event = "auth.failed", identifier = %identifier, "authentication failed");
                }
                return Err(e);
            }
        };

        let token = self.issuer.issue_default(&subject)?;

        info!(
            event = "auth.success",
            subject = %subject,
            expires_at = %token.expires_at(),
            "user authenticated"
        );

        Ok(token)
    }

    /// Check a bearer token and return its claims
    pub fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        self.issuer.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use chrono::Duration;
    use futures_util::future::join_all;

    use crate::auth::password::{hash_secret, MIN_COST};
    use crate::models::CredentialRecord;
    use crate::store::MemoryCredentialStore;

    const SECRET: &str = "service-test-signing-key-0123456789abcdef";

    fn service(store: MemoryCredentialStore, signing_key: &str) -> AuthService {
        let verifier =
            CredentialVerifier::new(Arc::new(store), StdDuration::from_secs(5), MIN_COST).unwrap();
        AuthService::new(verifier, TokenIssuer::new(signing_key, Duration::hours(2)))
    }

    #[tokio::test]
    async fn test_login_issues_token_for_identifier() {
        let store = MemoryCredentialStore::new().with_record(CredentialRecord::new(
            "alice",
            hash_secret("wonderland", MIN_COST).unwrap(),
        ));
        let service = service(store, SECRET);

        let token = service.login("alice", "wonderland").await.unwrap();
        let claims = service.authenticate(token.as_str()).unwrap();
        assert_eq!(claims.subject().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_before_signing() {
        let store = MemoryCredentialStore::new().with_record(CredentialRecord::new(
            "alice",
            hash_secret("wonderland", MIN_COST).unwrap(),
        ));
        // Rejection wins even when the key is unusable.
        let service = service(store, "");

        assert!(matches!(
            service.login("alice", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("alice", "wonderland").await,
            Err(AuthError::SigningError(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_are_independent() {
        let credentials: Vec<(String, String)> = (0..100)
            .map(|i| (format!("user-{i:03}"), format!("secret-{i:03}")))
            .collect();
        let store: MemoryCredentialStore = credentials
            .iter()
            .map(|(id, secret)| {
                CredentialRecord::new(id.clone(), hash_secret(secret, MIN_COST).unwrap())
            })
            .collect();
        let service = service(store, SECRET);

        let handles = credentials.into_iter().map(|(id, secret)| {
            let service = service.clone();
            tokio::spawn(async move {
                let token = service.login(&id, &secret).await?;
                let claims = service.authenticate(token.as_str())?;
                Ok::<_, AuthError>((id, claims))
            })
        });

        let results = join_all(handles).await;
        assert_eq!(results.len(), 100);
        for result in results {
            let (id, claims) = result.unwrap().unwrap();
            assert_eq!(claims.subject().as_str(), id);
        }
    }
}
