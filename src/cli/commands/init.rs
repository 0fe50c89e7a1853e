//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::progress::{EXIT_CONFIG, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "course-import.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing course-import configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your Studio URL and course id", self.output);
                println!("  2. Put COURSE_IMPORT_TOKEN=<token> in a .env file");
                println!("  3. Validate configuration: course-import validate-config");
                println!("  4. Run an import: course-import import course.tar.gz");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# course-import configuration

environment = "development"

[application]
log_level = "info"

[studio]
base_url = "https://studio.example.com"
course_id = "course-v1:edX+DemoX+Demo_Course"
auth_token = "${COURSE_IMPORT_TOKEN}"
tls_verify = true

[upload]
chunk_size_bytes = 20000000
allowed_extensions = [".tar.gz"]

[polling]
interval_ms = 3000

[session]
store_path = ".course-import/sessions.json"

[logging]
local_enabled = false
local_path = "/var/log/course-import"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# course-import configuration
#
# Uploads a course archive to Studio and follows the import job until it
# succeeds or fails. Values of the form ${VAR} are read from the environment;
# any key can also be overridden with COURSE_IMPORT_<SECTION>_<KEY>.

# development | staging | production
# Production refuses tls_verify = false.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
log_level = "info"

# ============================================================================
# Studio
# ============================================================================
[studio]
# Base URL of the Studio API; imports go to {base_url}/import/{course_id}
base_url = "https://studio.example.com"

# Course the archive is imported into
course_id = "course-v1:edX+DemoX+Demo_Course"

# Bearer token (use an environment variable)
auth_token = "${COURSE_IMPORT_TOKEN}"

# TLS certificate verification
tls_verify = true

# Optional per-request timeout in seconds
# timeout_seconds = 120

# ============================================================================
# Upload
# ============================================================================
[upload]
# Archives are sent in ranged chunks of this size (1 KiB - 100 MB)
chunk_size_bytes = 20000000

# Accepted file extensions
allowed_extensions = [".tar.gz"]

# ============================================================================
# Status polling
# ============================================================================
[polling]
# Fixed delay between status requests (>= 100)
interval_ms = 3000

# ============================================================================
# Session store
# ============================================================================
[session]
# JSON file remembering the last upload, so `course-import status` can resume
store_path = ".course-import/sessions.json"

# Scope the record is stored under (defaults to /import/{course_id})
# scope = "/import/course-v1:edX+DemoX+Demo_Course"

# ============================================================================
# Messages
# ============================================================================
[messages]
# Shown when a request fails without a server-supplied message
default_error = "An error occurred while importing the course."

# ============================================================================
# Logging
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Directory for log files
local_path = "/var/log/course-import"

# Rotation (daily or hourly)
local_rotation = "daily"

# Rotated log files to keep
local_max_files = 7
"#
        .to_string()
    }
}
