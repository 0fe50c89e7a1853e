//! HTTP client for the Studio import endpoints
//!
//! Uploads go to `POST {base}/import/{course_id}` as a sequence of multipart
//! requests, one per chunk, each carrying a `Content-Range` header. Job status
//! comes from `GET {base}/import/{course_id}/status/{file_name}`.

use super::models::{
    ChunkPlan, ErrorBody, ImportFile, ImportStatusResponse, ProgressCallback, UploadOptions,
};
use super::traits::{StatusTransport, UploadTransport};
use crate::config::{secret, SecretString, StudioConfig};
use crate::domain::{CourseId, FileName, ImportError, Result, StudioError};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_RANGE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// Multipart field carrying each chunk
const CHUNK_FIELD: &str = "course-data";

const ARCHIVE_MIME: &str = "application/gzip";

/// Studio import API client
///
/// # Example
///
/// ```no_run
/// use course_import::adapters::studio::StudioClient;
/// use course_import::config::StudioConfig;
///
/// # fn example() -> course_import::domain::Result<()> {
/// let client = StudioClient::new(&StudioConfig::default())?;
/// println!("Importing through {}", client.base_url());
/// # Ok(())
/// # }
/// ```
pub struct StudioClient {
    base_url: Url,
    client: Client,
    auth_token: Option<SecretString>,
}

impl StudioClient {
    /// Builds a client from the studio configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is unusable or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ImportError::Configuration(format!("Invalid studio.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ImportError::Configuration(format!(
                "studio.base_url cannot be used as a base: {}",
                config.base_url
            )));
        }

        let mut builder = ClientBuilder::new().connect_timeout(Duration::from_secs(30));
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for Studio client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            ImportError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Upload endpoint for a course
    pub fn import_url(&self, course_id: &CourseId) -> Result<Url> {
        self.endpoint(&["import", course_id.as_str()])
    }

    /// Status endpoint for an uploaded archive
    pub fn status_url(&self, course_id: &CourseId, file_name: &FileName) -> Result<Url> {
        self.endpoint(&["import", course_id.as_str(), "status", file_name.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ImportError::Configuration(format!(
                    "studio.base_url cannot be used as a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTHORIZATION, secret::bearer(token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                StudioError::Timeout(e.to_string())
            } else {
                StudioError::ConnectionFailed(e.to_string())
            }
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await.into())
        }
    }
}

/// Maps an unsuccessful response, keeping any server-supplied message
async fn error_from_response(response: Response) -> StudioError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let server_message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());

    match (status, server_message) {
        (403, message) => StudioError::AccessDenied(message.unwrap_or(body)),
        (404, _) => StudioError::NotFound(body),
        (status, Some(message)) => StudioError::Rejected { status, message },
        (status, None) => StudioError::from_status(status, body),
    }
}

#[async_trait]
impl UploadTransport for StudioClient {
    async fn upload(
        &self,
        course_id: &CourseId,
        file: &ImportFile,
        options: &UploadOptions,
        on_progress: ProgressCallback,
    ) -> Result<()> {
        let total = file.size().await?;
        let plan = ChunkPlan::new(total, options.chunk_size_bytes)?;
        let url = self.import_url(course_id)?;
        let disposition = format!("attachment; filename=\"{}\"", file.name());

        tracing::debug!(
            course_id = %course_id,
            file_name = %file.name(),
            total_bytes = total,
            chunks = plan.count(),
            "Starting chunked upload"
        );

        for chunk in plan.chunks() {
            let bytes = file.read_chunk(&chunk).await?;
            let part = Part::bytes(bytes)
                .file_name(file.name().to_string())
                .mime_str(ARCHIVE_MIME)
                .map_err(|e| ImportError::Other(format!("Invalid chunk content type: {e}")))?;
            let form = Form::new().part(CHUNK_FIELD, part);

            let request = self
                .client
                .post(url.clone())
                .header(CONTENT_RANGE, chunk.content_range(total))
                .header(CONTENT_DISPOSITION, disposition.as_str())
                .multipart(form);

            self.send(request).await?;

            let percent = plan.percent_after(chunk.index);
            tracing::trace!(
                chunk = chunk.index,
                percent = percent,
                "Chunk accepted"
            );
            on_progress(percent);
        }

        Ok(())
    }
}

#[async_trait]
impl StatusTransport for StudioClient {
    async fn fetch_status(
        &self,
        course_id: &CourseId,
        file_name: &FileName,
    ) -> Result<ImportStatusResponse> {
        let url = self.status_url(course_id, file_name)?;
        let response = self.send(self.client.get(url)).await?;

        response
            .json::<ImportStatusResponse>()
            .await
            .map_err(|e| StudioError::InvalidResponse(e.to_string()).into())
    }
}
