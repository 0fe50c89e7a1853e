//! Studio import API adapter
//!
//! [`StudioClient`] implements both [`UploadTransport`] and
//! [`StatusTransport`] over HTTP.

pub mod client;
pub mod models;
pub mod traits;

pub use client::StudioClient;
pub use models::{
    Chunk, ChunkPlan, ImportFile, ImportStatusResponse, ProgressCallback, UploadOptions,
};
pub use traits::{StatusTransport, UploadTransport};
