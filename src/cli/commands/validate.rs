//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the course-import configuration file.

use crate::cli::progress::EXIT_CONFIG;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Studio URL: {}", config.studio.base_url);
        println!("  Course: {}", config.studio.course_id);
        println!(
            "  Auth Token: {}",
            if config.studio.auth_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  TLS Verify: {}", config.studio.tls_verify);
        println!("  Chunk Size: {} bytes", config.upload.chunk_size_bytes);
        println!(
            "  Accepted Extensions: {}",
            config.upload.allowed_extensions.join(", ")
        );
        println!("  Poll Interval: {} ms", config.polling.interval_ms);
        println!("  Session Store: {}", config.session.store_path);
        println!("  Session Scope: {}", config.session_scope());
        println!();
        Ok(0)
    }
}
