//! Transport traits for the Studio import endpoints
//!
//! The orchestrator only sees these traits, so tests can script the server.

use super::models::{ImportFile, ImportStatusResponse, ProgressCallback, UploadOptions};
use crate::domain::{CourseId, FileName, Result};
use async_trait::async_trait;

/// Sends an archive to the server in sequential chunks
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Uploads `file` for `course_id`
    ///
    /// `on_progress` is called after each accepted chunk with the truncated
    /// completion percentage. The call resolves once every chunk has been
    /// accepted, or fails on the first rejected chunk.
    async fn upload(
        &self,
        course_id: &CourseId,
        file: &ImportFile,
        options: &UploadOptions,
        on_progress: ProgressCallback,
    ) -> Result<()>;
}

/// Fetches the server-side job status for an uploaded archive
#[async_trait]
pub trait StatusTransport: Send + Sync {
    async fn fetch_status(
        &self,
        course_id: &CourseId,
        file_name: &FileName,
    ) -> Result<ImportStatusResponse>;
}
