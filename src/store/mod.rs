//! Credential store collaborators
//!
//! The verifier only needs a read-only lookup by identifier. Handles are
//! passed in explicitly; nothing here reaches for global state.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CredentialRecord;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only lookup of credential records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the single record for `identifier`, if any.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, StoreError>;
}
