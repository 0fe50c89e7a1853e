//! Domain models and types for course imports.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CourseId`], [`FileName`])
//! - **Stage codes** ([`ImportStage`], [`StageCode`])
//! - **Error types** ([`ImportError`], [`StudioError`])
//! - **Result type alias** ([`Result`])
//!
//! # Stage Codes
//!
//! ```rust
//! use course_import::domain::{ImportStage, StageCode};
//!
//! assert_eq!(StageCode::decode(2).unwrap(), StageCode::Reached(ImportStage::Unpacking));
//! assert_eq!(StageCode::decode(-4).unwrap(), StageCode::FailedAt(ImportStage::Updating));
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ImportError>`]:
//!
//! ```rust,no_run
//! use course_import::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = course_import::config::load_config("course-import.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod stage;

// Re-export commonly used types for convenience
pub use errors::{ImportError, StudioError};
pub use ids::{CourseId, FileName};
pub use result::Result;
pub use stage::{ImportStage, StageCode};
