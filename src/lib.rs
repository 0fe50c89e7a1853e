// course-import - Studio course archive import client
// Copyright (c) 2025 course-import Contributors
// Licensed under the MIT License

//! # course-import
//!
//! A client for importing course archives into Studio. It uploads a `.tar.gz`
//! archive in ranged chunks, then polls the server-side import job through
//! its stages until it succeeds or fails.
//!
//! ## Overview
//!
//! This library provides:
//! - **Uploading** archives in `Content-Range` chunks with progress reporting
//! - **Polling** import status on a fixed interval with stale-result protection
//! - **Remembering** the last upload per course so a restart resumes polling
//! - **Projecting** the session onto a five-step progress view
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and progress rendering
//! - [`core`] - Import session, poller, orchestrator and stepper
//! - [`adapters`] - Studio HTTP client and session storage backends
//! - [`domain`] - Identifiers, stage codes and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use course_import::adapters::studio::ImportFile;
//! use course_import::config::load_config;
//! use course_import::core::import::ImportOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("course-import.toml")?;
//!     let orchestrator = ImportOrchestrator::from_config(&config)?;
//!
//!     orchestrator
//!         .start_import(ImportFile::from_path("course.tar.gz")?)
//!         .await?;
//!
//!     let snapshot = orchestrator.watch().wait_until_settled().await?;
//!     println!("Finished at stage {:?}", snapshot.current_stage);
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! The server reports progress as a stage code. Non-negative codes are the
//! stage reached; a negative code means the job failed at that stage:
//!
//! | Code | Stage      |
//! |------|------------|
//! | 0    | Initial    |
//! | 1    | Uploading  |
//! | 2    | Unpacking  |
//! | 3    | Verifying  |
//! | 4    | Updating   |
//! | 5    | Success    |
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::ImportError`]. Request failures during an import are folded into
//! the session instead, and surface through [`core::import::ImportSnapshot`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
