//! Core logic for course imports.
//!
//! # Modules
//!
//! - [`import`] - Session state machine, status poller and orchestrator
//! - [`state`] - Durable last-import record
//! - [`stepper`] - Progress view projection
//!
//! # Import Workflow
//!
//! 1. **Restore**: resume the last recorded upload for this course, if any
//! 2. **Upload**: send the archive in ranged chunks, reporting progress
//! 3. **Persist**: record the upload so a restart can resume polling
//! 4. **Poll**: fetch job status on a fixed interval until success or failure
//! 5. **Render**: project each snapshot onto the stepper
//!
//! # Example
//!
//! ```rust,no_run
//! use course_import::config::load_config;
//! use course_import::core::import::ImportOrchestrator;
//! use course_import::core::stepper::{project, StepperLabels};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("course-import.toml")?;
//! let orchestrator = ImportOrchestrator::from_config(&config)?;
//!
//! if orchestrator.restore().await {
//!     let snapshot = orchestrator.watch().wait_until_settled().await?;
//!     let view = project(&snapshot, &StepperLabels::default());
//!     println!("{} steps", view.steps.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod state;
pub mod stepper;
