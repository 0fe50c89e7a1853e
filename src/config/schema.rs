//! Configuration schema types
//!
//! This module defines the configuration structure for course imports.

use crate::config::SecretString;
use crate::domain::ids::CourseId;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main course import configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Studio server configuration
    pub studio: StudioConfig,

    /// Chunked upload settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Status polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Durable session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// User-facing message settings
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ImportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.studio.validate(&self.environment)?;
        self.upload.validate()?;
        self.polling.validate()?;
        self.session.validate()?;
        self.messages.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Scope the durable session record is stored under
    ///
    /// Defaults to the import page path of the configured course.
    pub fn session_scope(&self) -> String {
        self.session
            .scope
            .clone()
            .unwrap_or_else(|| format!("/import/{}", self.studio.course_id))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Studio server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Base URL of the Studio API (import endpoints live under `/import`)
    pub base_url: String,

    /// Course the archive is imported into
    pub course_id: String,

    /// Platform-issued access token, sent as a bearer token (optional)
    #[serde(default, skip_serializing)]
    pub auth_token: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the client to
    /// man-in-the-middle attacks. It is rejected in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Per-request timeout in seconds; unset leaves timeouts to the transport
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl StudioConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("studio.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("studio.base_url must start with http:// or https://".to_string());
        }

        CourseId::new(self.course_id.as_str()).map_err(|e| format!("studio.course_id: {e}"))?;

        if self.timeout_seconds == Some(0) {
            return Err("studio.timeout_seconds must be > 0 when set".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use 'environment = \"development\"' for local testing."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:18010".to_string(),
            course_id: "course-v1:edX+DemoX+Demo_Course".to_string(),
            auth_token: None,
            tls_verify: true,
            timeout_seconds: None,
        }
    }
}

/// Chunked upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Size of each uploaded chunk in bytes
    #[serde(default = "default_chunk_size_bytes")]
    pub chunk_size_bytes: u64,

    /// Accepted archive extensions
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl UploadConfig {
    fn validate(&self) -> Result<(), String> {
        if !(MIN_CHUNK_SIZE_BYTES..=MAX_CHUNK_SIZE_BYTES).contains(&self.chunk_size_bytes) {
            return Err(format!(
                "upload.chunk_size_bytes must be between {} and {}, got {}",
                MIN_CHUNK_SIZE_BYTES, MAX_CHUNK_SIZE_BYTES, self.chunk_size_bytes
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err("upload.allowed_extensions cannot be empty".to_string());
        }

        if let Some(ext) = self.allowed_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(format!(
                "upload.allowed_extensions entries must start with '.', got '{ext}'"
            ));
        }

        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size_bytes: default_chunk_size_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Status polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Fixed delay between status requests in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_ms < 100 {
            return Err(format!(
                "polling.interval_ms must be >= 100, got {}",
                self.interval_ms
            ));
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Durable session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding session records
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Scope override; defaults to `/import/{course_id}`
    #[serde(default)]
    pub scope: Option<String>,
}

impl SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.store_path.is_empty() {
            return Err("session.store_path cannot be empty".to_string());
        }
        if let Some(scope) = &self.scope {
            if !scope.starts_with('/') {
                return Err(format!("session.scope must start with '/', got '{scope}'"));
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            scope: None,
        }
    }
}

/// User-facing message configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Shown when a request failed without a server-supplied message
    #[serde(default = "default_error_message")]
    pub default_error: String,
}

impl MessagesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_error.trim().is_empty() {
            return Err("messages.default_error cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            default_error: default_error_message(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Rotated log files kept in `local_path`; older ones are deleted
    #[serde(default = "default_local_max_files")]
    pub local_max_files: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_files == 0 {
            return Err("logging.local_max_files must be > 0".to_string());
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_files: default_local_max_files(),
        }
    }
}

const MIN_CHUNK_SIZE_BYTES: u64 = 1024;
const MAX_CHUNK_SIZE_BYTES: u64 = 100_000_000;

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chunk_size_bytes() -> u64 {
    20_000_000
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".tar.gz".to_string()]
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_store_path() -> String {
    ".course-import/sessions.json".to_string()
}

fn default_error_message() -> String {
    "An error occurred while importing the course.".to_string()
}

fn default_local_path() -> String {
    "/var/log/course-import".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_files() -> usize {
    7
}
