//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ImportConfig;
use crate::config::secret_string;
use crate::domain::errors::ImportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ImportConfig
/// 4. Applies environment variable overrides (COURSE_IMPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use course_import::config::loader::load_config;
///
/// let config = load_config("course-import.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ImportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ImportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ImportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<ImportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ImportConfig = toml::from_str(&contents)
        .map_err(|e| ImportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ImportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ImportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Placeholders inside comments stay untouched
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ImportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using COURSE_IMPORT_* prefix
///
/// Environment variables follow the pattern: COURSE_IMPORT_<SECTION>_<KEY>
/// For example: COURSE_IMPORT_STUDIO_BASE_URL, COURSE_IMPORT_POLLING_INTERVAL_MS
fn apply_env_overrides(config: &mut ImportConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Studio overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_STUDIO_BASE_URL") {
        config.studio.base_url = val;
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_STUDIO_COURSE_ID") {
        config.studio.course_id = val;
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_STUDIO_AUTH_TOKEN") {
        config.studio.auth_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_STUDIO_TLS_VERIFY") {
        config.studio.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_STUDIO_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.studio.timeout_seconds = Some(seconds);
        }
    }

    // Upload overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_UPLOAD_CHUNK_SIZE_BYTES") {
        if let Ok(size) = val.parse() {
            config.upload.chunk_size_bytes = size;
        }
    }

    // Polling overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_POLLING_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.polling.interval_ms = interval;
        }
    }

    // Session overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_SESSION_STORE_PATH") {
        config.session.store_path = val;
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_SESSION_SCOPE") {
        config.session.scope = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COURSE_IMPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COURSE_IMPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
