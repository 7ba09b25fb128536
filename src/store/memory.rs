use std::collections::HashMap;

use async_trait::async_trait;

use super::{CredentialStore, StoreError};
use crate::models::CredentialRecord;

/// Fixed, in-process credential store.
///
/// Built once and never mutated afterwards, so it can be shared behind an
/// `Arc` without locking. Useful for tests and local runs without Postgres.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    records: HashMap<String, CredentialRecord>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, replacing any previous record with the same identifier.
    pub fn with_record(mut self, record: CredentialRecord) -> Self {
        self.records.insert(record.identifier.clone(), record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CredentialRecord> for MemoryCredentialStore {
    fn from_iter<I: IntoIterator<Item = CredentialRecord>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |store, record| store.with_record(record))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.get(identifier).cloned())
    }
}
