use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, StoreError};
use crate::models::CredentialRecord;

/// Postgres-backed credential store.
///
/// Each lookup checks a connection out of the pool and returns it when the
/// query future completes or is dropped.
#[derive(Clone)]
pub struct PgCredentialStore {
    db_pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT user_name AS identifier, password_hash AS secret_hash
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(record)
    }
}
