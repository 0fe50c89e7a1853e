//! Durable record of the most recent upload
//!
//! Persisted under the `lastimport` key so a restarted client can resume
//! polling the job it started before.

use crate::domain::ids::FileName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key the record is stored under within its scope
pub const LAST_IMPORT_KEY: &str = "lastimport";

/// Last successful upload for a scope
///
/// Serialized as `{"fileName": "...", "date": <epoch millis>}`.
///
/// # Examples
///
/// ```
/// use course_import::core::state::SessionRecord;
/// use course_import::domain::FileName;
/// use chrono::{TimeZone, Utc};
///
/// let record = SessionRecord::new(
///     FileName::new("course.tar.gz").unwrap(),
///     Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
/// );
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(json, r#"{"fileName":"course.tar.gz","date":1700000000000}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Archive the job is keyed by
    pub file_name: FileName,

    /// When the upload completed
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(file_name: FileName, date: DateTime<Utc>) -> Self {
        Self { file_name, date }
    }
}
