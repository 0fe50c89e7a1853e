//! Failure classification
//!
//! Every error the orchestrator sees ends up as one [`ImportFailure`], which
//! drives the derived flags of the session.

use crate::domain::{ImportError, ImportStage, StudioError};
use serde::Serialize;
use std::fmt;

/// Which request produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Upload,
    Status,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Upload => write!(f, "upload"),
            RequestKind::Status => write!(f, "status"),
        }
    }
}

/// Why an import session stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportFailure {
    /// Upload or status request failed at the network/HTTP layer
    Transport {
        origin: RequestKind,
        status: Option<u16>,
        /// Message the server supplied, shown instead of the fallback
        server_message: Option<String>,
        detail: String,
    },

    /// Status request rejected with 403
    AccessDenied { detail: String },

    /// The server reported the job as failed
    JobFailed {
        stage: ImportStage,
        message: Option<String>,
    },
}

impl ImportFailure {
    /// Classifies an error raised by `origin`
    pub fn classify(origin: RequestKind, error: &ImportError) -> Self {
        match error {
            ImportError::Studio(StudioError::AccessDenied(detail))
                if origin == RequestKind::Status =>
            {
                ImportFailure::AccessDenied {
                    detail: detail.clone(),
                }
            }
            ImportError::Studio(StudioError::Rejected { status, message }) => {
                ImportFailure::Transport {
                    origin,
                    status: Some(*status),
                    server_message: Some(message.clone()),
                    detail: error.to_string(),
                }
            }
            ImportError::Studio(studio) => ImportFailure::Transport {
                origin,
                status: studio.status(),
                server_message: None,
                detail: error.to_string(),
            },
            other => ImportFailure::Transport {
                origin,
                status: None,
                server_message: None,
                detail: other.to_string(),
            },
        }
    }

    /// Job failure reported through the status endpoint
    pub fn job_failed(stage: ImportStage, message: Option<&str>) -> Self {
        ImportFailure::JobFailed {
            stage,
            message: message.filter(|m| !m.is_empty()).map(str::to_string),
        }
    }

    /// Whether this counts towards `any_request_failed`
    ///
    /// Access denial is surfaced separately.
    pub fn is_request_failure(&self) -> bool {
        !matches!(self, ImportFailure::AccessDenied { .. })
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, ImportFailure::AccessDenied { .. })
    }

    /// Message the server supplied, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ImportFailure::Transport { server_message, .. } => server_message.as_deref(),
            ImportFailure::JobFailed { message, .. } => message.as_deref(),
            ImportFailure::AccessDenied { .. } => None,
        }
    }

    /// Stage the job failed at, when the server said so
    pub fn failed_stage(&self) -> Option<ImportStage> {
        match self {
            ImportFailure::JobFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFailure::Transport { origin, detail, .. } => {
                write!(f, "{origin} request failed: {detail}")
            }
            ImportFailure::AccessDenied { .. } => write!(f, "access denied"),
            ImportFailure::JobFailed { stage, message } => match message {
                Some(m) => write!(f, "import failed at {stage}: {m}"),
                None => write!(f, "import failed at {stage}"),
            },
        }
    }
}
