//! Secret hashing and verification
//!
//! Secrets are stored as salted bcrypt hashes. Verification re-derives the
//! hash from the presented secret and compares in constant time inside
//! `bcrypt::verify`.
//!
//! bcrypt only reads the first 72 bytes of its input, so longer secrets are
//! refused outright instead of being silently truncated.

use thiserror::Error;
use tracing::warn;

pub use bcrypt::{BcryptError, DEFAULT_COST};

/// Lowest cost bcrypt accepts. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Longest secret bcrypt hashes without truncation, in bytes.
pub const MAX_SECRET_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("secret is {0} bytes, at most 72 allowed")]
    TooLong(usize),

    #[error(transparent)]
    Bcrypt(#[from] BcryptError),
}

/// Whether bcrypt would see all of `secret`
pub fn is_hashable(secret: &str) -> bool {
    secret.len() <= MAX_SECRET_BYTES
}

/// Hash a secret with a fresh random salt.
pub fn hash_secret(secret: &str, cost: u32) -> Result<String, PasswordError> {
    if !is_hashable(secret) {
        return Err(PasswordError::TooLong(secret.len()));
    }
    Ok(bcrypt::hash(secret, cost)?)
}

/// Check a secret against a stored hash.
///
/// A hash that cannot be parsed, or a secret too long to hash, counts as a
/// mismatch.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    if !is_hashable(secret) {
        return false;
    }

    match bcrypt::verify(secret, stored_hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "stored secret hash is unreadable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_secret("correct horse", MIN_COST).unwrap();
        assert!(verify_secret("correct horse", &hash));
        assert!(!verify_secret("battery staple", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_secret("same", MIN_COST).unwrap();
        let b = hash_secret("same", MIN_COST).unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("same"));
    }

    #[test]
    fn test_plaintext_stored_value_never_matches() {
        assert!(!verify_secret("hunter2", "hunter2"));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        assert!(matches!(
            hash_secret("secret", 2),
            Err(PasswordError::Bcrypt(_))
        ));
    }

    #[test]
    fn test_secret_past_72_bytes_is_not_truncated() {
        let prefix = "a".repeat(72);
        assert!(matches!(
            hash_secret(&format!("{prefix}correct"), MIN_COST),
            Err(PasswordError::TooLong(79))
        ));

        // A hash of the bare prefix must not accept anything that extends it.
        let hash = hash_secret(&prefix, MIN_COST).unwrap();
        assert!(verify_secret(&prefix, &hash));
        assert!(!verify_secret(&format!("{prefix}correct"), &hash));
        assert!(!verify_secret(&format!("{prefix}WRONG"), &hash));
    }

    #[test]
    fn test_byte_length_not_char_length_is_checked() {
        // 36 two-byte chars: 36 chars, 72 bytes.
        let at_limit = "é".repeat(36);
        assert!(hash_secret(&at_limit, MIN_COST).is_ok());

        let over_limit = "é".repeat(37);
        assert!(matches!(
            hash_secret(&over_limit, MIN_COST),
            Err(PasswordError::TooLong(74))
        ));
    }
}
