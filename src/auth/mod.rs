//! Authentication module for gatekeeper
//!
//! Credential verification and token issuance.
//! - bcrypt-hashed secrets, checked without revealing which field was wrong
//! - HS256 compact tokens carrying subject and expiry
//! - `AuthService` tying both together for the HTTP layer

mod error;
mod jwt;
pub mod password;
mod service;
mod verifier;

pub use error::{AuthError, ErrorBody};
pub use jwt::{Claims, SignedToken, TokenIssuer, DEFAULT_TOKEN_TTL_SECS, MIN_SECRET_LEN};
pub use service::AuthService;
pub use verifier::CredentialVerifier;
