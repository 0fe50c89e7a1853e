//! Configuration management for course imports.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `COURSE_IMPORT_<SECTION>_<KEY>` environment overrides
//! - Comprehensive validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use course_import::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("course-import.toml")?;
//!
//! println!("Studio URL: {}", config.studio.base_url);
//! println!("Poll interval: {}ms", config.polling.interval_ms);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`StudioConfig`] - Studio endpoint, course and access token
//! - [`UploadConfig`] - Chunk size and accepted archive extensions
//! - [`PollingConfig`] - Status polling cadence
//! - [`SessionConfig`] - Durable session store location and scope
//! - [`MessagesConfig`] - Fallback error text
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [studio]
//! base_url = "https://studio.example.com"
//! course_id = "course-v1:edX+DemoX+Demo_Course"
//! auth_token = "${COURSE_IMPORT_TOKEN}"
//!
//! [upload]
//! chunk_size_bytes = 20000000
//!
//! [polling]
//! interval_ms = 3000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, Environment, ImportConfig, LoggingConfig, MessagesConfig, PollingConfig,
    SessionConfig, StudioConfig, UploadConfig,
};
pub use secret::{secret_string, SecretString, TokenValue};
