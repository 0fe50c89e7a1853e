//! JSON file session storage
//!
//! The whole store is one JSON document shaped `{scope: {key: record}}`.
//! Writes go to a sibling temp file which is then renamed over the original.

use super::traits::SessionStorage;
use crate::core::state::record::SessionRecord;
use crate::domain::{ImportError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Document = BTreeMap<String, BTreeMap<String, SessionRecord>>;

/// Session storage backed by a JSON file
///
/// # Example
///
/// ```no_run
/// use course_import::adapters::storage::{FileSessionStorage, SessionStorage};
///
/// # async fn example() -> course_import::domain::Result<()> {
/// let storage = FileSessionStorage::new(".course-import/sessions.json");
/// let record = storage.load_record("/import/course-v1:edX+DemoX", "lastimport").await?;
/// println!("{record:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(ImportError::SessionStore(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            ImportError::SessionStore(format!(
                "Corrupt session store {}: {e}",
                self.path.display()
            ))
        })
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ImportError::SessionStore(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_vec_pretty(document)?;
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        tokio::fs::write(&temp, json).await.map_err(|e| {
            ImportError::SessionStore(format!("Failed to write {}: {e}", temp.display()))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            ImportError::SessionStore(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load_record(&self, scope: &str, key: &str) -> Result<Option<SessionRecord>> {
        let mut document = self.read_document().await?;
        Ok(document
            .get_mut(scope)
            .and_then(|entries| entries.remove(key)))
    }

    async fn save_record(&self, scope: &str, key: &str, record: &SessionRecord) -> Result<()> {
        // Read-modify-write must not interleave within the process
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document
            .entry(scope.to_string())
            .or_default()
            .insert(key.to_string(), record.clone());
        self.write_document(&document).await?;

        tracing::debug!(
            path = %self.path.display(),
            scope = scope,
            file_name = %record.file_name,
            "Session record saved"
        );
        Ok(())
    }

    async fn list_records(&self, key: &str) -> Result<Vec<(String, SessionRecord)>> {
        let document = self.read_document().await?;
        Ok(document
            .into_iter()
            .filter_map(|(scope, mut entries)| entries.remove(key).map(|r| (scope, r)))
            .collect())
    }
}
