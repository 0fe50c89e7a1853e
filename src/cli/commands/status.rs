//! Status command implementation
//!
//! Restores the last recorded upload for the configured course and follows
//! its import job, or lists every recorded upload with `--all`.

use crate::adapters::storage::FileSessionStorage;
use crate::cli::progress::{self, ProgressRenderer, EXIT_CONFIG, EXIT_FATAL, EXIT_INTERRUPTED};
use crate::config::load_config;
use crate::core::import::ImportOrchestrator;
use crate::core::state::SessionStore;
use crate::core::stepper::StepperLabels;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List the last upload recorded for every scope instead of following one
    #[arg(long)]
    pub all: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Checking import status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(EXIT_CONFIG);
            }
        };

        if self.all {
            let store = SessionStore::new(
                Arc::new(FileSessionStorage::new(&config.session.store_path)),
                config.session_scope(),
            );
            return self.list(&store).await;
        }

        let orchestrator = match ImportOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => {
                println!("❌ Failed to set up import");
                println!("   Error: {}", e);
                return Ok(EXIT_CONFIG);
            }
        };

        if !orchestrator.restore().await {
            println!(
                "No import history found for {}.",
                orchestrator.course_id()
            );
            println!("Run 'course-import import <FILE>' to start one.");
            return Ok(0);
        }

        let mut renderer = ProgressRenderer::new(StepperLabels::default());
        let settled =
            progress::follow(&orchestrator, &mut renderer, shutdown_signal, true).await?;

        match settled {
            Some(snapshot) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                Ok(progress::exit_code(&snapshot))
            }
            None => Ok(EXIT_INTERRUPTED),
        }
    }

    async fn list(&self, store: &SessionStore) -> anyhow::Result<i32> {
        let records = match store.load_all().await {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to read session store");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        if records.is_empty() {
            println!("No import history found.");
            return Ok(0);
        }

        println!("📊 Recorded imports: {}", records.len());
        println!();
        println!("{:<50} {:<40} {:<25}", "Scope", "File", "Uploaded");
        println!("{}", "-".repeat(115));
        for (scope, record) in records {
            println!(
                "{:<50} {:<40} {:<25}",
                scope,
                record.file_name,
                record.date.format("%Y-%m-%d %H:%M:%S")
            );
        }
        println!();
        Ok(0)
    }
}
