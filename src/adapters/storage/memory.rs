//! In-process session storage
//!
//! Nothing survives the process; used by tests and one-shot runs.

use super::traits::SessionStorage;
use crate::core::state::record::SessionRecord;
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Session storage held in memory
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    records: RwLock<BTreeMap<(String, String), SessionRecord>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load_record(&self, scope: &str, key: &str) -> Result<Option<SessionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&(scope.to_string(), key.to_string())).cloned())
    }

    async fn save_record(&self, scope: &str, key: &str, record: &SessionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert((scope.to_string(), key.to_string()), record.clone());
        Ok(())
    }

    async fn list_records(&self, key: &str) -> Result<Vec<(String, SessionRecord)>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((_, k), _)| k == key)
            .map(|((scope, _), record)| (scope.clone(), record.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileName;
    use chrono::Utc;

    #[tokio::test]
    async fn test_memory_storage_overwrites() {
        let storage = MemorySessionStorage::new();
        let first = SessionRecord::new(FileName::new("a.tar.gz").unwrap(), Utc::now());
        let second = SessionRecord::new(FileName::new("b.tar.gz").unwrap(), Utc::now());

        storage.save_record("/import/x", "lastimport", &first).await.unwrap();
        storage.save_record("/import/x", "lastimport", &second).await.unwrap();

        let loaded = storage.load_record("/import/x", "lastimport").await.unwrap();
        assert_eq!(loaded, Some(second));
    }

    #[tokio::test]
    async fn test_memory_storage_scopes_are_isolated() {
        let storage = MemorySessionStorage::new();
        let record = SessionRecord::new(FileName::new("a.tar.gz").unwrap(), Utc::now());

        storage.save_record("/import/x", "lastimport", &record).await.unwrap();

        assert!(storage
            .load_record("/import/y", "lastimport")
            .await
            .unwrap()
            .is_none());
        assert_eq!(storage.list_records("lastimport").await.unwrap().len(), 1);
    }
}
