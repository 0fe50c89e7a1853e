//! Session storage abstraction
//!
//! Records are addressed by a scope (typically the import page path) and a
//! key within that scope.

use crate::core::state::record::SessionRecord;
use crate::domain::Result;
use async_trait::async_trait;

/// Durable key/value storage for session records
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load the record stored under `scope`/`key`
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(record))` if found, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or holds an
    /// unreadable record.
    async fn load_record(&self, scope: &str, key: &str) -> Result<Option<SessionRecord>>;

    /// Save (overwrite) the record stored under `scope`/`key`
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn save_record(&self, scope: &str, key: &str, record: &SessionRecord) -> Result<()>;

    /// All records with the scope they belong to, ordered by scope
    async fn list_records(&self, key: &str) -> Result<Vec<(String, SessionRecord)>>;
}
