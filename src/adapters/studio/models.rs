//! Studio import API models
//!
//! Wire types for the import endpoints plus the local description of the
//! archive being uploaded.

use crate::domain::ids::FileName;
use crate::domain::{ImportError, Result, StageCode};
use serde::{Deserialize, Serialize};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Progress callback invoked with a whole percentage in `0..=100`
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Body of `GET /import/{course_id}/status/{file_name}`
///
/// The server sends `ImportStatus` / `Message`; camelCase is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatusResponse {
    /// Stage code, negated on failure
    #[serde(alias = "ImportStatus")]
    pub import_status: i32,

    /// Error text; empty or absent while the job is healthy
    #[serde(default, alias = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ImportStatusResponse {
    /// Creates a response, mostly useful for tests and fakes
    pub fn new(import_status: i32, message: impl Into<String>) -> Self {
        Self {
            import_status,
            message: Some(message.into()),
        }
    }

    /// Decodes the stage code
    ///
    /// # Errors
    ///
    /// Returns a `Studio::InvalidResponse` error for codes outside `-4..=5`.
    pub fn stage_code(&self) -> Result<StageCode> {
        StageCode::decode(self.import_status).map_err(|e| {
            ImportError::Studio(crate::domain::StudioError::InvalidResponse(e))
        })
    }

    /// The message if it is non-empty
    ///
    /// Any non-empty message marks the job as failed, whatever the stage sign.
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Error body returned by the import endpoints on rejection
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, alias = "ErrMsg", alias = "Message", alias = "error")]
    pub message: Option<String>,
}

/// Per-upload transport options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Size of each chunk in bytes
    pub chunk_size_bytes: u64,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size_bytes: 20_000_000,
        }
    }
}

/// One contiguous slice of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the plan
    pub index: u64,
    /// First byte offset
    pub start: u64,
    /// Last byte offset, inclusive
    pub end: u64,
}

impl Chunk {
    /// Number of bytes in the chunk, at least one
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this chunk
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

/// Splits an archive of `total` bytes into fixed-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    /// Builds a plan for a non-empty archive
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty archive or a zero chunk size.
    pub fn new(total: u64, chunk_size: u64) -> Result<Self> {
        if total == 0 {
            return Err(ImportError::Validation("Archive is empty".to_string()));
        }
        if chunk_size == 0 {
            return Err(ImportError::Validation(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { total, chunk_size })
    }

    /// Total archive size in bytes
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of chunks
    pub fn count(&self) -> u64 {
        self.total.div_ceil(self.chunk_size)
    }

    /// Chunks in upload order
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (0..self.count()).map(move |index| {
            let start = index * self.chunk_size;
            let stop = (start + self.chunk_size).min(self.total);
            Chunk {
                index,
                start,
                end: stop - 1,
            }
        })
    }

    /// Whole percentage reported once chunk `index` is accepted
    pub fn percent_after(&self, index: u64) -> u8 {
        let percent = (index + 1) * 100 / self.count();
        percent.min(100) as u8
    }
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// Archive selected for import
#[derive(Debug, Clone)]
pub struct ImportFile {
    name: FileName,
    source: FileSource,
}

impl ImportFile {
    /// References an archive on disk; the name is the path's final component
    ///
    /// # Errors
    ///
    /// Returns a validation error if the path has no usable file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ImportError::Validation(format!("Path has no file name: {}", path.display()))
            })?;
        let name = FileName::new(name).map_err(ImportError::Validation)?;

        Ok(Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wraps an in-memory archive
    pub fn from_bytes(name: FileName, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name,
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// Name the job is keyed by
    pub fn name(&self) -> &FileName {
        &self.name
    }

    /// Archive size in bytes
    pub async fn size(&self) -> Result<u64> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::metadata(path).await?.len()),
            FileSource::Memory(bytes) => Ok(bytes.len() as u64),
        }
    }

    /// Reads the bytes covered by `chunk`
    pub async fn read_chunk(&self, chunk: &Chunk) -> Result<Vec<u8>> {
        let len = usize::try_from(chunk.size())
            .map_err(|_| ImportError::Validation("Chunk too large for memory".to_string()))?;

        match &self.source {
            FileSource::Path(path) => {
                let mut file = tokio::fs::File::open(path).await?;
                file.seek(SeekFrom::Start(chunk.start)).await?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf).await?;
                Ok(buf)
            }
            FileSource::Memory(bytes) => {
                let start = usize::try_from(chunk.start).map_err(|_| {
                    ImportError::Validation("Chunk offset out of range".to_string())
                })?;
                bytes
                    .get(start..start + len)
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| {
                        ImportError::Validation(format!(
                            "Chunk {} is outside the archive",
                            chunk.index
                        ))
                    })
            }
        }
    }
}
