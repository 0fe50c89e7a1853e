//! Import stage codes
//!
//! The server reports an import job's progress as a signed integer. A
//! non-negative value is the stage the job has reached; the negation of an
//! in-progress stage means the job failed while at that stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered processing stages of an import job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    /// Nothing triggered yet
    Initial = 0,
    /// Archive upload in progress
    Uploading = 1,
    /// Server is unpacking the archive
    Unpacking = 2,
    /// Server is verifying content
    Verifying = 3,
    /// Server is updating the course
    Updating = 4,
    /// Import finished
    Success = 5,
}

impl ImportStage {
    /// All stages in order
    pub const ALL: [ImportStage; 6] = [
        ImportStage::Initial,
        ImportStage::Uploading,
        ImportStage::Unpacking,
        ImportStage::Verifying,
        ImportStage::Updating,
        ImportStage::Success,
    ];

    /// Numeric wire code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a stage by its non-negative code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|stage| stage.code() == code)
    }

    /// True for the stages a job can fail at
    pub fn is_in_progress(self) -> bool {
        !matches!(self, ImportStage::Initial | ImportStage::Success)
    }

    /// Short label used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            ImportStage::Initial => "initial",
            ImportStage::Uploading => "uploading",
            ImportStage::Unpacking => "unpacking",
            ImportStage::Verifying => "verifying",
            ImportStage::Updating => "updating",
            ImportStage::Success => "success",
        }
    }
}

impl Default for ImportStage {
    fn default() -> Self {
        Self::Initial
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.code())
    }
}

/// A decoded `importStatus` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageCode {
    /// The job has reached this stage
    Reached(ImportStage),
    /// The job failed while at this stage
    FailedAt(ImportStage),
}

impl StageCode {
    /// Decodes a raw status code
    ///
    /// Only `-4..=5` are valid: a job cannot fail "at" `INITIAL` or `SUCCESS`.
    pub fn decode(raw: i32) -> Result<Self, String> {
        if raw >= 0 {
            return ImportStage::from_code(raw)
                .map(StageCode::Reached)
                .ok_or_else(|| format!("Unknown import stage code: {raw}"));
        }

        match ImportStage::from_code(raw.saturating_neg()) {
            Some(stage) if stage.is_in_progress() => Ok(StageCode::FailedAt(stage)),
            _ => Err(format!("Unknown import failure code: {raw}")),
        }
    }

    /// The stage this code refers to, regardless of sign
    pub fn stage(self) -> ImportStage {
        match self {
            StageCode::Reached(stage) | StageCode::FailedAt(stage) => stage,
        }
    }

    /// True for negative codes
    pub fn is_failure(self) -> bool {
        matches!(self, StageCode::FailedAt(_))
    }
}
