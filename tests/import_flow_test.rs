//! Integration tests for the import lifecycle
//!
//! These tests drive an [`ImportOrchestrator`] against scripted transports
//! and verify that:
//! - Stages only move forward and polling stops at a terminal state
//! - A restored session is visible before the first poll answers
//! - Failures are classified (job failure, access denied, transport)
//! - A new upload fully resets the session and outruns stale results

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use course_import::adapters::storage::{MemorySessionStorage, SessionStorage};
use course_import::adapters::studio::{
    ImportFile, ImportStatusResponse, ProgressCallback, StatusTransport, UploadOptions,
    UploadTransport,
};
use course_import::core::import::{ImportOptions, ImportOrchestrator, ImportSnapshot};
use course_import::core::state::SessionStore;
use course_import::core::stepper::{self, PageView, StepState, StepperLabels};
use course_import::domain::{CourseId, FileName, ImportError, ImportStage, Result, StudioError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

const SCOPE: &str = "/import/demo";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Upload transport reporting a fixed progress sequence
struct ScriptedUpload {
    progress: Vec<u8>,
    outcome: Mutex<Option<ImportError>>,
    /// Uploads of this file wait for a notification before finishing
    gated: Option<(FileName, Arc<Notify>)>,
}

impl ScriptedUpload {
    fn accepting() -> Self {
        Self {
            progress: vec![50, 100],
            outcome: Mutex::new(None),
            gated: None,
        }
    }

    fn failing(error: ImportError) -> Self {
        Self {
            progress: vec![25],
            outcome: Mutex::new(Some(error)),
            gated: None,
        }
    }

    fn gated(file_name: &str, gate: Arc<Notify>) -> Self {
        Self {
            gated: Some((FileName::new(file_name).unwrap(), gate)),
            ..Self::accepting()
        }
    }
}

#[async_trait]
impl UploadTransport for ScriptedUpload {
    async fn upload(
        &self,
        _course_id: &CourseId,
        file: &ImportFile,
        _options: &UploadOptions,
        on_progress: ProgressCallback,
    ) -> Result<()> {
        if let Some((name, gate)) = &self.gated {
            if name == file.name() {
                gate.notified().await;
            }
        }
        for percent in &self.progress {
            on_progress(*percent);
        }
        match self.outcome.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Status transport replaying scripted answers per file
///
/// The last answer for a file repeats once its script runs out.
struct ScriptedStatus {
    scripts: Mutex<Vec<(FileName, VecDeque<Result<ImportStatusResponse>>)>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedStatus {
    fn new() -> Self {
        Self {
            scripts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Every request waits for one notification before answering
    fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn script(self, file_name: &str, answers: Vec<Result<ImportStatusResponse>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push((FileName::new(file_name).unwrap(), answers.into()));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_answer(&self, file_name: &FileName) -> Result<ImportStatusResponse> {
        let mut scripts = self.scripts.lock().unwrap();
        let (_, answers) = scripts
            .iter_mut()
            .find(|(name, _)| name == file_name)
            .expect("no script for file");

        if answers.len() > 1 {
            answers.pop_front().unwrap()
        } else {
            clone_answer(answers.front().expect("empty script"))
        }
    }
}

#[async_trait]
impl StatusTransport for ScriptedStatus {
    async fn fetch_status(
        &self,
        _course_id: &CourseId,
        file_name: &FileName,
    ) -> Result<ImportStatusResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.next_answer(file_name)
    }
}

fn clone_answer(answer: &Result<ImportStatusResponse>) -> Result<ImportStatusResponse> {
    match answer {
        Ok(response) => Ok(response.clone()),
        Err(ImportError::Studio(StudioError::AccessDenied(m))) => {
            Err(StudioError::AccessDenied(m.clone()).into())
        }
        Err(e) => Err(ImportError::Other(e.to_string())),
    }
}

fn reply(code: i32, message: &str) -> Result<ImportStatusResponse> {
    Ok(ImportStatusResponse::new(code, message))
}

fn archive(name: &str) -> ImportFile {
    ImportFile::from_bytes(FileName::new(name).unwrap(), vec![7u8; 64])
}

fn orchestrator_with(
    upload: ScriptedUpload,
    status: Arc<ScriptedStatus>,
    storage: Arc<dyn SessionStorage>,
) -> ImportOrchestrator {
    ImportOrchestrator::new(
        CourseId::new("demo").unwrap(),
        Arc::new(upload),
        status,
        SessionStore::new(storage, SCOPE),
        ImportOptions {
            poll_interval: POLL_INTERVAL,
            ..Default::default()
        },
    )
}

fn orchestrator(upload: ScriptedUpload, status: Arc<ScriptedStatus>) -> ImportOrchestrator {
    orchestrator_with(upload, status, Arc::new(MemorySessionStorage::new()))
}

async fn settle(orchestrator: &ImportOrchestrator) -> ImportSnapshot {
    tokio::time::timeout(Duration::from_secs(5), orchestrator.watch().wait_until_settled())
        .await
        .expect("import did not settle")
        .unwrap()
}

#[tokio::test]
async fn test_upload_then_poll_to_success() {
    let status = Arc::new(ScriptedStatus::new().script(
        "course.tar.gz",
        vec![reply(1, ""), reply(3, ""), reply(5, "")],
    ));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status.clone());

    let after_upload = orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    assert!(after_upload.import_triggered);
    assert_eq!(after_upload.upload_progress, 100);
    assert!(after_upload.polling_enabled);

    let snapshot = settle(&orchestrator).await;
    assert_eq!(snapshot.current_stage, ImportStage::Success);
    assert!(snapshot.success_date.is_some());
    assert!(!snapshot.polling_enabled);
    assert!(!snapshot.any_request_failed);
    assert!(snapshot.accepts_new_upload);
    assert_eq!(status.calls(), 3);
}

#[tokio::test]
async fn test_no_polls_after_terminal_state() {
    let status = Arc::new(ScriptedStatus::new().script("course.tar.gz", vec![reply(5, "")]));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status.clone());

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    settle(&orchestrator).await;
    let calls = status.calls();

    tokio::time::sleep(POLL_INTERVAL * 10).await;
    assert_eq!(status.calls(), calls);
}

#[tokio::test]
async fn test_stage_never_moves_backwards() {
    let status = Arc::new(ScriptedStatus::new().script(
        "course.tar.gz",
        vec![reply(3, ""), reply(2, ""), reply(5, "")],
    ));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status);
    let mut watcher = orchestrator.watch();

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();

    let mut highest = ImportStage::Initial;
    loop {
        let snapshot = tokio::time::timeout(Duration::from_secs(5), watcher.changed())
            .await
            .expect("no progress")
            .unwrap();
        assert!(snapshot.current_stage >= highest);
        highest = snapshot.current_stage;
        if snapshot.is_settled() {
            break;
        }
    }
    assert_eq!(highest, ImportStage::Success);
}

#[tokio::test]
async fn test_restored_session_visible_before_first_poll() {
    let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
    let uploaded_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    SessionStore::new(Arc::clone(&storage), SCOPE)
        .save(&FileName::new("a.tar.gz").unwrap(), uploaded_at)
        .await
        .unwrap();

    let gate = Arc::new(Notify::new());
    let status = Arc::new(
        ScriptedStatus::new()
            .with_gate(gate.clone())
            .script("a.tar.gz", vec![reply(2, ""), reply(5, "")]),
    );
    let orchestrator = orchestrator_with(ScriptedUpload::accepting(), status, storage);

    assert!(orchestrator.restore().await);
    let restored = orchestrator.snapshot();
    assert!(restored.import_triggered);
    assert_eq!(restored.file_name.as_ref().map(FileName::as_str), Some("a.tar.gz"));
    assert_eq!(restored.current_stage, ImportStage::Initial);
    assert_eq!(restored.success_date, Some(uploaded_at));

    let mut watcher = orchestrator.watch();
    gate.notify_one();
    let unpacking = watcher
        .wait_for(|s| s.current_stage == ImportStage::Unpacking)
        .await
        .unwrap();
    assert_eq!(unpacking.success_date, Some(uploaded_at));

    gate.notify_one();
    let done = settle(&orchestrator).await;
    assert_eq!(done.current_stage, ImportStage::Success);
    assert_eq!(done.success_date, Some(uploaded_at));
}

#[tokio::test]
async fn test_job_failure_reports_stage_and_message() {
    let status = Arc::new(ScriptedStatus::new().script(
        "course.tar.gz",
        vec![reply(3, ""), reply(-4, "bad archive")],
    ));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status);

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    let snapshot = settle(&orchestrator).await;

    assert_eq!(snapshot.failed_stage, Some(ImportStage::Updating));
    assert_eq!(snapshot.current_stage, ImportStage::Verifying);
    assert_eq!(snapshot.formatted_error_message, "bad archive");
    assert!(snapshot.any_request_failed);
    assert!(!snapshot.polling_enabled);
    assert!(snapshot.accepts_new_upload);

    let view = stepper::project(&snapshot, &StepperLabels::default());
    let states: Vec<StepState> = view.steps.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![
            StepState::Done,
            StepState::Done,
            StepState::Done,
            StepState::Error,
            StepState::Pending,
        ]
    );
    assert!(!view.show_outline_link);
}

#[tokio::test]
async fn test_message_with_non_negative_stage_is_failure() {
    let status = Arc::new(
        ScriptedStatus::new().script("course.tar.gz", vec![reply(3, "Disk quota exceeded")]),
    );
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status);

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    let snapshot = settle(&orchestrator).await;

    assert_eq!(snapshot.current_stage, ImportStage::Verifying);
    assert_eq!(snapshot.failed_stage, Some(ImportStage::Verifying));
    assert_eq!(snapshot.formatted_error_message, "Disk quota exceeded");
    assert!(snapshot.any_request_failed);
}

#[tokio::test]
async fn test_access_denied_is_not_a_request_failure() {
    let status = Arc::new(
        ScriptedStatus::new()
            .script(
                "course.tar.gz",
                vec![Err(StudioError::AccessDenied("forbidden".to_string()).into())],
            )
            .script("retry.tar.gz", vec![reply(5, "")]),
    );
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status.clone());

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    let snapshot = settle(&orchestrator).await;

    assert!(snapshot.is_loading_denied);
    assert!(!snapshot.any_request_failed);
    assert!(!snapshot.accepts_new_upload);
    assert_eq!(snapshot.current_stage, ImportStage::Uploading);
    assert_eq!(snapshot.formatted_error_message, "");
    assert_eq!(
        stepper::page(&snapshot, &StepperLabels::default()),
        PageView::AccessDenied
    );

    tokio::time::sleep(POLL_INTERVAL * 5).await;
    assert_eq!(status.calls(), 1);

    // The picker stays closed, but an explicit trigger still starts over
    orchestrator
        .start_import(archive("retry.tar.gz"))
        .await
        .unwrap();
    let retried = settle(&orchestrator).await;
    assert!(!retried.is_loading_denied);
    assert_eq!(retried.current_stage, ImportStage::Success);
}

#[tokio::test]
async fn test_status_transport_error_uses_fallback_message() {
    let status = Arc::new(ScriptedStatus::new().script(
        "course.tar.gz",
        vec![Err(StudioError::NotFound("no such job".to_string()).into())],
    ));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status);

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    let snapshot = settle(&orchestrator).await;

    assert!(snapshot.any_request_failed);
    assert!(!snapshot.is_loading_denied);
    assert_eq!(
        snapshot.formatted_error_message,
        "An error occurred while importing the course."
    );
}

#[tokio::test]
async fn test_rejected_upload_never_polls() {
    let status = Arc::new(ScriptedStatus::new().script("course.tar.gz", vec![reply(5, "")]));
    let orchestrator = orchestrator(
        ScriptedUpload::failing(
            StudioError::Rejected {
                status: 400,
                message: "Archive too large".to_string(),
            }
            .into(),
        ),
        status.clone(),
    );

    let snapshot = orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();

    assert!(snapshot.is_settled());
    assert!(snapshot.any_request_failed);
    assert_eq!(snapshot.formatted_error_message, "Archive too large");
    assert_eq!(snapshot.upload_progress, 25);

    tokio::time::sleep(POLL_INTERVAL * 5).await;
    assert_eq!(status.calls(), 0);
}

#[tokio::test]
async fn test_upload_persists_last_import_record() {
    let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
    let status = Arc::new(ScriptedStatus::new().script("course.tar.gz", vec![reply(5, "")]));
    let orchestrator = orchestrator_with(ScriptedUpload::accepting(), status, Arc::clone(&storage));

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();

    let record = SessionStore::new(storage, SCOPE)
        .load()
        .await
        .unwrap()
        .expect("record saved");
    assert_eq!(record.file_name.as_str(), "course.tar.gz");
}

#[tokio::test]
async fn test_new_upload_resets_session() {
    let gate = Arc::new(Notify::new());
    let status = Arc::new(
        ScriptedStatus::new()
            .script("a.tar.gz", vec![reply(3, "")])
            .script("b.tar.gz", vec![reply(2, "")]),
    );
    let orchestrator = orchestrator(ScriptedUpload::gated("b.tar.gz", gate.clone()), status);
    let mut watcher = orchestrator.watch();

    orchestrator.start_import(archive("a.tar.gz")).await.unwrap();
    watcher
        .wait_for(|s| s.current_stage == ImportStage::Verifying)
        .await
        .unwrap();

    let second = orchestrator.start_import(archive("b.tar.gz"));
    let check = async {
        let during = watcher
            .wait_for(|s| s.file_name.as_ref().map(FileName::as_str) == Some("b.tar.gz"))
            .await
            .unwrap();
        assert_eq!(during.current_stage, ImportStage::Uploading);
        assert_eq!(during.upload_progress, 0);
        assert!(during.any_request_in_progress);
        assert!(!during.accepts_new_upload);
        gate.notify_one();
    };
    let (result, ()) = tokio::join!(second, check);
    result.unwrap();

    let snapshot = watcher
        .wait_for(|s| s.current_stage == ImportStage::Unpacking)
        .await
        .unwrap();
    assert_eq!(snapshot.file_name.as_ref().map(FileName::as_str), Some("b.tar.gz"));
}

#[tokio::test]
async fn test_stale_status_is_ignored_after_new_upload() {
    let gate = Arc::new(Notify::new());
    let status = Arc::new(
        ScriptedStatus::new()
            .with_gate(gate.clone())
            .script("a.tar.gz", vec![reply(5, "")])
            .script("b.tar.gz", vec![reply(2, "")]),
    );
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status.clone());

    // First poll for a.tar.gz is now parked on the gate
    orchestrator.start_import(archive("a.tar.gz")).await.unwrap();
    while status.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    orchestrator.start_import(archive("b.tar.gz")).await.unwrap();
    while status.calls() < 2 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // Release both parked requests; a.tar.gz answers SUCCESS for a dead session
    gate.notify_waiters();

    let snapshot = orchestrator
        .watch()
        .wait_for(|s| s.current_stage == ImportStage::Unpacking)
        .await
        .unwrap();
    tokio::time::sleep(POLL_INTERVAL * 3).await;

    let latest = orchestrator.snapshot();
    assert_eq!(snapshot.file_name.as_ref().map(FileName::as_str), Some("b.tar.gz"));
    assert_ne!(latest.current_stage, ImportStage::Success);
    assert_eq!(latest.file_name.as_ref().map(FileName::as_str), Some("b.tar.gz"));
}

#[tokio::test]
async fn test_stop_polling_settles_idle_session() {
    let status = Arc::new(ScriptedStatus::new().script("course.tar.gz", vec![reply(2, "")]));
    let orchestrator = orchestrator(ScriptedUpload::accepting(), status.clone());

    orchestrator
        .start_import(archive("course.tar.gz"))
        .await
        .unwrap();
    orchestrator
        .watch()
        .wait_for(|s| s.current_stage == ImportStage::Unpacking)
        .await
        .unwrap();

    orchestrator.stop_polling();
    let snapshot = settle(&orchestrator).await;
    assert!(!snapshot.polling_enabled);
    assert!(!snapshot.is_terminal);

    let calls = status.calls();
    tokio::time::sleep(POLL_INTERVAL * 5).await;
    assert!(status.calls() <= calls + 1);
}
