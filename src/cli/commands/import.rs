//! Import command implementation
//!
//! Uploads an archive and follows the import job until it settles.

use crate::adapters::studio::ImportFile;
use crate::cli::progress::{self, ProgressRenderer, EXIT_CONFIG, EXIT_FATAL, EXIT_INTERRUPTED};
use crate::config::load_config;
use crate::core::import::ImportOrchestrator;
use crate::core::stepper::StepperLabels;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Course archive to upload (.tar.gz)
    pub file: PathBuf,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let orchestrator = match ImportOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => {
                println!("❌ Failed to set up import");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let file = match ImportFile::from_path(&self.file) {
            Ok(f) => f,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_FATAL);
            }
        };

        tracing::info!(
            file = %self.file.display(),
            course_id = %orchestrator.course_id(),
            "Starting course import"
        );
        println!(
            "📤 Importing {} into {}",
            file.name(),
            orchestrator.course_id()
        );
        println!();

        let mut renderer = ProgressRenderer::new(StepperLabels::default());
        let upload = orchestrator.start_import(file);
        let follow = progress::follow(&orchestrator, &mut renderer, shutdown_signal, true);
        tokio::pin!(upload);
        tokio::pin!(follow);

        let mut uploaded = false;
        let settled = loop {
            tokio::select! {
                result = &mut upload, if !uploaded => {
                    uploaded = true;
                    if let Err(e) = result {
                        println!("❌ {e}");
                        return Ok(EXIT_FATAL);
                    }
                }
                followed = &mut follow => break followed?,
            }
        };

        match settled {
            Some(snapshot) => {
                let code = progress::exit_code(&snapshot);
                if code == 0 {
                    println!("✅ Import finished");
                }
                Ok(code)
            }
            None => {
                println!("⚠️  Stopped watching. Run 'course-import status' to resume.");
                Ok(EXIT_INTERRUPTED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_import_missing_config_is_config_error() {
        let args = ImportArgs {
            file: PathBuf::from("course.tar.gz"),
        };
        let (_tx, rx) = watch::channel(false);

        let code = args.execute("does-not-exist.toml", rx).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_import_rejects_wrong_extension() {
        let mut config = NamedTempFile::new().unwrap();
        writeln!(
            config,
            "[studio]\nbase_url = \"http://127.0.0.1:9\"\ncourse_id = \"demo\"\n\n[session]\nstore_path = \"{}\"",
            std::env::temp_dir()
                .join("course-import-cli-test.json")
                .display()
        )
        .unwrap();

        let args = ImportArgs {
            file: PathBuf::from("course.zip"),
        };
        let (_tx, rx) = watch::channel(false);

        let code = args
            .execute(config.path().to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, EXIT_FATAL);
    }
}
