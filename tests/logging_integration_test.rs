//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so
//! everything that needs it lives in a single test.

use course_import::config::LoggingConfig;
use course_import::domain::{CourseId, FileName, ImportError, ImportStage};
use course_import::logging::init_logging;
use course_import::{log_error_with_context, log_import_triggered, log_stage_transition};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_max_files, 7);
}

#[test]
fn test_file_logging_creates_directory_and_rejects_reinit() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
        local_max_files: 3,
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    let course_id = CourseId::new("demo").unwrap();
    let file_name = FileName::new("course.tar.gz").unwrap();
    log_import_triggered!(&course_id, &file_name, 1u64);
    log_stage_transition!(&file_name, ImportStage::Uploading, ImportStage::Unpacking);
    let error = ImportError::Validation("bad archive".to_string());
    log_error_with_context!(&error, "Upload failed");

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    drop(guard);
    let written = std::fs::read_dir(&log_path).unwrap().count();
    assert!(written >= 1);
}

#[test]
fn test_invalid_log_level() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(matches!(result, Err(ImportError::Configuration(_))));
}
