//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros that keep the
//! field names of recurring import events consistent.
//!
//! # Example
//!
//! ```no_run
//! use course_import::logging::init_logging;
//! use course_import::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an import session
///
/// # Example
///
/// ```no_run
/// use course_import::log_import_triggered;
/// use course_import::domain::{CourseId, FileName};
///
/// let course_id = CourseId::new("course-v1:edX+DemoX+Demo_Course").unwrap();
/// let file_name = FileName::new("course.tar.gz").unwrap();
/// log_import_triggered!(&course_id, &file_name, 1u64);
/// ```
#[macro_export]
macro_rules! log_import_triggered {
    ($course_id:expr, $file_name:expr, $generation:expr) => {
        tracing::info!(
            course_id = %$course_id,
            file_name = %$file_name,
            generation = $generation,
            "Import triggered"
        );
    };
}

/// Log a server-reported stage change
///
/// # Example
///
/// ```no_run
/// use course_import::log_stage_transition;
/// use course_import::domain::ImportStage;
///
/// log_stage_transition!("course.tar.gz", ImportStage::Uploading, ImportStage::Unpacking);
/// ```
#[macro_export]
macro_rules! log_stage_transition {
    ($file_name:expr, $from:expr, $to:expr) => {
        tracing::info!(
            file_name = %$file_name,
            from = %$from,
            to = %$to,
            "Import stage advanced"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use course_import::log_error_with_context;
/// use course_import::domain::ImportError;
///
/// let error = ImportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
