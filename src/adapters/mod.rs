//! External system integrations for course imports.
//!
//! - [`studio`] - Studio import API (chunked upload and job status)
//! - [`storage`] - Durable session storage (JSON file, in-memory)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits
//! ([`studio::UploadTransport`], [`studio::StatusTransport`],
//! [`storage::SessionStorage`]) so the orchestrator can be driven by scripted
//! fakes in tests.
//!
//! ```rust,no_run
//! use course_import::adapters::studio::{StatusTransport, StudioClient};
//! use course_import::config::StudioConfig;
//! use course_import::domain::{CourseId, FileName};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StudioClient::new(&StudioConfig::default())?;
//! let status = client
//!     .fetch_status(
//!         &CourseId::new("course-v1:edX+DemoX+Demo_Course")?,
//!         &FileName::new("course.tar.gz")?,
//!     )
//!     .await?;
//! println!("stage code {}", status.import_status);
//! # Ok(())
//! # }
//! ```

pub mod storage;
pub mod studio;
