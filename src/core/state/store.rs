//! Session store for the last-upload record
//!
//! Wraps a [`SessionStorage`] backend and pins it to one scope and the
//! `lastimport` key.

use super::record::{SessionRecord, LAST_IMPORT_KEY};
use crate::adapters::storage::SessionStorage;
use crate::domain::ids::FileName;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Persists and restores the most recent upload for a scope
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    scope: String,
}

impl SessionStore {
    /// Create a store bound to `scope`
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend
    /// * `scope` - Scope the record is visible within, e.g. `/import/{course_id}`
    pub fn new(storage: Arc<dyn SessionStorage>, scope: impl Into<String>) -> Self {
        Self {
            storage,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Record a completed upload, replacing any earlier record
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn save(&self, file_name: &FileName, date: DateTime<Utc>) -> Result<()> {
        let record = SessionRecord::new(file_name.clone(), date);
        tracing::debug!(
            scope = %self.scope,
            file_name = %file_name,
            date = %date,
            "Persisting last import"
        );
        self.storage
            .save_record(&self.scope, LAST_IMPORT_KEY, &record)
            .await
    }

    /// Load the last upload recorded for this scope
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails or the record is unreadable.
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        self.storage.load_record(&self.scope, LAST_IMPORT_KEY).await
    }

    /// Every scope's last upload
    pub async fn load_all(&self) -> Result<Vec<(String, SessionRecord)>> {
        self.storage.list_records(LAST_IMPORT_KEY).await
    }
}
