//! Import orchestrator - owns one course's import session
//!
//! The orchestrator runs the upload, persists the last-import record, arms
//! the [`StatusPoller`] and publishes every session change on a watch
//! channel. Consumers read through [`ImportWatcher`] handles.

use super::failure::{ImportFailure, RequestKind};
use super::poller::StatusPoller;
use super::session::{ImportSession, ImportSnapshot};
use crate::adapters::storage::{FileSessionStorage, SessionStorage};
use crate::adapters::studio::{
    ImportFile, ProgressCallback, StatusTransport, StudioClient, UploadOptions, UploadTransport,
};
use crate::config::ImportConfig;
use crate::core::state::SessionStore;
use crate::domain::{CourseId, FileName, ImportError, Result};
use crate::{log_error_with_context, log_import_triggered};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Fallback shown when a failure carries no server message
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while importing the course.";

/// Tunables for an orchestrator
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub upload: UploadOptions,
    pub poll_interval: Duration,
    /// Accepted archive suffixes, matched case-insensitively
    pub allowed_extensions: Vec<String>,
    pub default_error: String,
}

impl ImportOptions {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            upload: UploadOptions {
                chunk_size_bytes: config.upload.chunk_size_bytes,
            },
            poll_interval: Duration::from_millis(config.polling.interval_ms),
            allowed_extensions: config.upload.allowed_extensions.clone(),
            default_error: config.messages.default_error.clone(),
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            upload: UploadOptions::default(),
            poll_interval: Duration::from_millis(3000),
            allowed_extensions: vec![".tar.gz".to_string()],
            default_error: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Import orchestrator
///
/// # Example
///
/// ```rust,no_run
/// use course_import::adapters::studio::ImportFile;
/// use course_import::config::load_config;
/// use course_import::core::import::ImportOrchestrator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("course-import.toml")?;
/// let orchestrator = ImportOrchestrator::from_config(&config)?;
///
/// orchestrator.start_import(ImportFile::from_path("course.tar.gz")?).await?;
/// let snapshot = orchestrator.watch().wait_until_settled().await?;
/// println!("finished at {}", snapshot.current_stage);
/// # Ok(())
/// # }
/// ```
pub struct ImportOrchestrator {
    course_id: CourseId,
    uploader: Arc<dyn UploadTransport>,
    status: Arc<dyn StatusTransport>,
    store: SessionStore,
    options: ImportOptions,
    state: Arc<watch::Sender<ImportSession>>,
    poller: Mutex<Option<JoinHandle<()>>>,
    default_error: Arc<str>,
}

impl ImportOrchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        course_id: CourseId,
        uploader: Arc<dyn UploadTransport>,
        status: Arc<dyn StatusTransport>,
        store: SessionStore,
        options: ImportOptions,
    ) -> Self {
        let (state, _) = watch::channel(ImportSession::new());
        let default_error = Arc::from(options.default_error.as_str());

        Self {
            course_id,
            uploader,
            status,
            store,
            options,
            state: Arc::new(state),
            poller: Mutex::new(None),
            default_error,
        }
    }

    /// Wire an orchestrator to Studio over HTTP and a file-backed session store
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the course id or Studio client is invalid.
    pub fn from_config(config: &ImportConfig) -> Result<Self> {
        let course_id =
            CourseId::new(config.studio.course_id.as_str()).map_err(ImportError::Configuration)?;
        let client = Arc::new(StudioClient::new(&config.studio)?);
        let storage: Arc<dyn SessionStorage> =
            Arc::new(FileSessionStorage::new(&config.session.store_path));
        let store = SessionStore::new(storage, config.session_scope());

        tracing::debug!(
            course_id = %course_id,
            base_url = %client.base_url(),
            scope = %store.scope(),
            "Import orchestrator configured"
        );

        Ok(Self::new(
            course_id,
            client.clone(),
            client,
            store,
            ImportOptions::from_config(config),
        ))
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// New read handle on the session
    pub fn watch(&self) -> ImportWatcher {
        ImportWatcher {
            rx: self.state.subscribe(),
            default_error: Arc::clone(&self.default_error),
        }
    }

    /// Current derived state
    pub fn snapshot(&self) -> ImportSnapshot {
        self.state.borrow().snapshot(&self.default_error)
    }

    /// Resume the last recorded upload, if any
    ///
    /// Returns whether a record was restored. A session that is already
    /// triggered is left alone, and a store that cannot be read counts as
    /// "no record".
    pub async fn restore(&self) -> bool {
        if self.state.borrow().triggered() {
            return false;
        }

        let record = match self.store.load().await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load last import record");
                return false;
            }
        };

        let mut restored = None;
        self.state.send_modify(|session| {
            if !session.triggered() {
                restored = Some(session.restore(&record));
            }
        });

        match restored {
            Some(generation) => {
                tracing::info!(
                    course_id = %self.course_id,
                    file_name = %record.file_name,
                    uploaded_at = %record.date,
                    "Restored last import"
                );
                self.arm_poller(generation, record.file_name);
                true
            }
            None => false,
        }
    }

    /// Upload `file` and track its import job
    ///
    /// Resolves once the upload settles; polling continues in the background.
    /// Upload failures are captured in the session, not returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before touching the session, if the file
    /// extension is not accepted.
    pub async fn start_import(&self, file: ImportFile) -> Result<ImportSnapshot> {
        self.check_extension(file.name())?;

        let file_name = file.name().clone();
        let mut generation = 0;
        self.state.send_modify(|session| {
            generation = session.trigger(file_name.clone(), Utc::now());
        });
        log_import_triggered!(&self.course_id, &file_name, generation);

        let progress_state = Arc::clone(&self.state);
        let on_progress: ProgressCallback = Arc::new(move |percent| {
            progress_state
                .send_if_modified(|session| session.record_upload_progress(generation, percent));
        });

        match self
            .uploader
            .upload(&self.course_id, &file, &self.options.upload, on_progress)
            .await
        {
            Ok(()) => {
                let completed_at = Utc::now();
                if let Err(e) = self.store.save(&file_name, completed_at).await {
                    log_error_with_context!(&e, "Failed to persist last import record");
                }

                let armed = self
                    .state
                    .send_if_modified(|session| session.complete_upload(generation, completed_at));
                if armed {
                    tracing::info!(file_name = %file_name, "Upload accepted, polling status");
                    self.arm_poller(generation, file_name);
                }
            }
            Err(e) => {
                log_error_with_context!(&e, "Upload failed");
                let failure = ImportFailure::classify(RequestKind::Upload, &e);
                self.state
                    .send_if_modified(|session| session.fail_upload(generation, failure));
            }
        }

        Ok(self.snapshot())
    }

    /// Stop scheduling poll ticks; an in-flight request still lands
    pub fn stop_polling(&self) {
        if self.state.send_if_modified(ImportSession::disable_polling) {
            tracing::info!(course_id = %self.course_id, "Status polling disabled");
        }
    }

    fn check_extension(&self, file_name: &FileName) -> Result<()> {
        let accepted = self.options.allowed_extensions.is_empty()
            || self
                .options
                .allowed_extensions
                .iter()
                .any(|ext| file_name.has_extension(ext));

        if accepted {
            Ok(())
        } else {
            Err(ImportError::Validation(format!(
                "{} is not an accepted archive (expected {})",
                file_name,
                self.options.allowed_extensions.join(", ")
            )))
        }
    }

    fn arm_poller(&self, generation: u64, file_name: FileName) {
        let poller = StatusPoller::new(
            self.course_id.clone(),
            Arc::clone(&self.status),
            Arc::clone(&self.state),
            self.options.poll_interval,
        );
        let handle = poller.spawn(generation, file_name);

        // A superseded poller exits on its next tick
        if let Ok(mut slot) = self.poller.lock() {
            *slot = Some(handle);
        }
    }
}

impl Drop for ImportOrchestrator {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.poller.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

/// Read handle on an orchestrator's session
///
/// Outlives nothing: once the orchestrator is gone every wait fails with
/// [`ImportError::ContextClosed`].
#[derive(Clone)]
pub struct ImportWatcher {
    rx: watch::Receiver<ImportSession>,
    default_error: Arc<str>,
}

impl ImportWatcher {
    /// Latest snapshot without waiting
    pub fn current(&self) -> ImportSnapshot {
        self.rx.borrow().snapshot(&self.default_error)
    }

    /// Waits for the next change and returns the new snapshot
    pub async fn changed(&mut self) -> Result<ImportSnapshot> {
        self.rx.changed().await.map_err(|_| closed())?;
        Ok(self.rx.borrow_and_update().snapshot(&self.default_error))
    }

    /// Waits until `predicate` holds for the current snapshot
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Result<ImportSnapshot>
    where
        F: FnMut(&ImportSnapshot) -> bool,
    {
        loop {
            let snapshot = self.rx.borrow_and_update().snapshot(&self.default_error);
            if predicate(&snapshot) {
                return Ok(snapshot);
            }
            self.rx.changed().await.map_err(|_| closed())?;
        }
    }

    /// Waits until the session has nothing left in progress
    pub async fn wait_until_settled(&mut self) -> Result<ImportSnapshot> {
        self.wait_for(ImportSnapshot::is_settled).await
    }
}

fn closed() -> ImportError {
    ImportError::ContextClosed("import orchestrator was dropped".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemorySessionStorage;
    use crate::adapters::studio::ImportStatusResponse;
    use crate::domain::ImportStage;
    use async_trait::async_trait;

    struct AcceptAll;

    #[async_trait]
    impl UploadTransport for AcceptAll {
        async fn upload(
            &self,
            _course_id: &CourseId,
            _file: &ImportFile,
            _options: &UploadOptions,
            on_progress: ProgressCallback,
        ) -> Result<()> {
            on_progress(100);
            Ok(())
        }
    }

    struct AlwaysSucceeded;

    #[async_trait]
    impl StatusTransport for AlwaysSucceeded {
        async fn fetch_status(
            &self,
            _course_id: &CourseId,
            _file_name: &FileName,
        ) -> Result<ImportStatusResponse> {
            Ok(ImportStatusResponse::new(5, ""))
        }
    }

    fn orchestrator() -> ImportOrchestrator {
        let store = SessionStore::new(Arc::new(MemorySessionStorage::new()), "/import/demo");
        ImportOrchestrator::new(
            CourseId::new("demo").unwrap(),
            Arc::new(AcceptAll),
            Arc::new(AlwaysSucceeded),
            store,
            ImportOptions {
                poll_interval: Duration::from_millis(10),
                ..Default::default()
            },
        )
    }

    fn archive(name: &str) -> ImportFile {
        ImportFile::from_bytes(FileName::new(name).unwrap(), vec![1u8; 16])
    }

    #[tokio::test]
    async fn test_rejects_unaccepted_extension_without_triggering() {
        let orchestrator = orchestrator();
        let err = orchestrator.start_import(archive("course.zip")).await.unwrap_err();

        assert!(matches!(err, ImportError::Validation(_)));
        assert!(!orchestrator.snapshot().import_triggered);
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        let orchestrator = orchestrator();
        let snapshot = orchestrator
            .start_import(archive("COURSE.TAR.GZ"))
            .await
            .unwrap();
        assert!(snapshot.import_triggered);
    }

    #[tokio::test]
    async fn test_watcher_fails_after_drop() {
        let orchestrator = orchestrator();
        let mut watcher = orchestrator.watch();
        drop(orchestrator);

        let err = watcher.changed().await.unwrap_err();
        assert!(matches!(err, ImportError::ContextClosed(_)));
    }

    #[tokio::test]
    async fn test_upload_then_poll_to_success() {
        let orchestrator = orchestrator();
        let mut watcher = orchestrator.watch();

        orchestrator
            .start_import(archive("course.tar.gz"))
            .await
            .unwrap();
        let snapshot = watcher.wait_until_settled().await.unwrap();

        assert_eq!(snapshot.current_stage, ImportStage::Success);
        assert!(snapshot.success_date.is_some());
        assert!(!snapshot.polling_enabled);
    }

    #[tokio::test]
    async fn test_restore_without_record_is_noop() {
        let orchestrator = orchestrator();
        assert!(!orchestrator.restore().await);
        assert!(!orchestrator.snapshot().import_triggered);
    }
}
