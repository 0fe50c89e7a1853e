//! Import session state machine
//!
//! [`ImportSession`] is plain data plus the transitions the orchestrator and
//! poller apply to it. It performs no I/O; every transition that can race a
//! newer session takes the `generation` it was started under and is a no-op
//! when that generation is stale.

use super::failure::{ImportFailure, RequestKind};
use crate::adapters::studio::ImportStatusResponse;
use crate::core::state::SessionRecord;
use crate::domain::{FileName, ImportStage, StageCode};
use crate::log_stage_transition;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a poll result did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Result belonged to a superseded session and was dropped
    Stale,
    /// Session is still running; keep polling
    Continue,
    /// Session reached success or failed; polling is now disabled
    Terminal,
}

/// Mutable state of one import
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    file_name: Option<FileName>,
    started_at: Option<DateTime<Utc>>,
    stage: ImportStage,
    triggered: bool,
    polling_enabled: bool,
    upload_progress: u8,
    last_error: Option<ImportFailure>,
    failed_stage: Option<ImportStage>,
    success_date: Option<DateTime<Utc>>,
    upload_in_flight: bool,
    poll_in_flight: bool,
    generation: u64,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every field and starts a fresh upload of `file_name`
    ///
    /// Returns the new generation.
    pub fn trigger(&mut self, file_name: FileName, now: DateTime<Utc>) -> u64 {
        let generation = self.generation + 1;
        *self = ImportSession {
            file_name: Some(file_name),
            started_at: Some(now),
            stage: ImportStage::Uploading,
            triggered: true,
            upload_in_flight: true,
            generation,
            ..ImportSession::default()
        };
        generation
    }

    /// Resumes tracking a previously uploaded archive
    ///
    /// The stage stays `Initial` until the first poll reports the real one.
    pub fn restore(&mut self, record: &SessionRecord) -> u64 {
        let generation = self.generation + 1;
        *self = ImportSession {
            file_name: Some(record.file_name.clone()),
            started_at: Some(record.date),
            triggered: true,
            polling_enabled: true,
            success_date: Some(record.date),
            generation,
            ..ImportSession::default()
        };
        generation
    }

    /// Records upload progress; returns whether anything changed
    pub fn record_upload_progress(&mut self, generation: u64, percent: u8) -> bool {
        if generation != self.generation || !self.upload_in_flight {
            return false;
        }
        let percent = percent.min(100);
        if percent <= self.upload_progress {
            return false;
        }
        self.upload_progress = percent;
        true
    }

    /// Marks the upload accepted and arms polling
    ///
    /// Returns whether polling was armed.
    pub fn complete_upload(&mut self, generation: u64, now: DateTime<Utc>) -> bool {
        if generation != self.generation || !self.upload_in_flight {
            return false;
        }
        self.upload_in_flight = false;
        self.success_date = Some(now);
        self.polling_enabled = self.file_name.is_some() && self.last_error.is_none();
        self.polling_enabled
    }

    /// Records an upload failure; polling is never armed afterwards
    pub fn fail_upload(&mut self, generation: u64, failure: ImportFailure) -> bool {
        if generation != self.generation || !self.upload_in_flight {
            return false;
        }
        self.upload_in_flight = false;
        self.fail(failure);
        true
    }

    /// Whether a poll for (`generation`, `file_name`) may fire now
    pub fn should_poll(&self, generation: u64, file_name: &FileName) -> bool {
        self.polling_enabled && self.triggered && !self.is_stale(generation, file_name)
    }

    /// Marks a poll request in flight if polling is still wanted
    pub fn begin_poll(&mut self, generation: u64, file_name: &FileName) -> bool {
        if !self.should_poll(generation, file_name) {
            return false;
        }
        self.poll_in_flight = true;
        true
    }

    /// Applies a status response
    pub fn apply_status(
        &mut self,
        generation: u64,
        file_name: &FileName,
        response: &ImportStatusResponse,
    ) -> PollOutcome {
        if self.is_stale(generation, file_name) {
            tracing::debug!(
                file_name = %file_name,
                generation = generation,
                "Dropping status for superseded session"
            );
            return PollOutcome::Stale;
        }
        self.poll_in_flight = false;

        match response.stage_code() {
            Err(e) => self.fail(ImportFailure::classify(RequestKind::Status, &e)),
            Ok(StageCode::FailedAt(stage)) => {
                self.fail(ImportFailure::job_failed(stage, response.failure_message()))
            }
            Ok(StageCode::Reached(stage)) => {
                self.adopt_stage(stage, file_name);
                if let Some(message) = response.failure_message() {
                    self.fail(ImportFailure::job_failed(self.stage, Some(message)));
                }
            }
        }

        self.settle()
    }

    /// Applies a failed status request
    pub fn apply_status_error(
        &mut self,
        generation: u64,
        file_name: &FileName,
        failure: ImportFailure,
    ) -> PollOutcome {
        if self.is_stale(generation, file_name) {
            return PollOutcome::Stale;
        }
        self.poll_in_flight = false;
        self.fail(failure);
        self.settle()
    }

    /// Stops further poll ticks without touching any in-flight request
    pub fn disable_polling(&mut self) -> bool {
        let was_enabled = self.polling_enabled;
        self.polling_enabled = false;
        was_enabled
    }

    fn is_stale(&self, generation: u64, file_name: &FileName) -> bool {
        generation != self.generation || self.file_name.as_ref() != Some(file_name)
    }

    fn adopt_stage(&mut self, stage: ImportStage, file_name: &FileName) {
        if stage > self.stage {
            log_stage_transition!(file_name, self.stage, stage);
            self.stage = stage;
        } else if stage < self.stage {
            tracing::debug!(
                file_name = %file_name,
                current = %self.stage,
                reported = %stage,
                "Ignoring lower stage"
            );
        }
    }

    fn fail(&mut self, failure: ImportFailure) {
        self.polling_enabled = false;
        if self.last_error.is_some() {
            return;
        }
        tracing::warn!(failure = %failure, "Import session failed");
        self.failed_stage = failure.failed_stage();
        self.last_error = Some(failure);
    }

    fn settle(&mut self) -> PollOutcome {
        if self.is_terminal() {
            self.polling_enabled = false;
            PollOutcome::Terminal
        } else {
            PollOutcome::Continue
        }
    }

    pub fn file_name(&self) -> Option<&FileName> {
        self.file_name.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    pub fn polling_enabled(&self) -> bool {
        self.polling_enabled
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn last_error(&self) -> Option<&ImportFailure> {
        self.last_error.as_ref()
    }

    pub fn failed_stage(&self) -> Option<ImportStage> {
        self.failed_stage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Upload error, poll error or job failure
    pub fn any_request_failed(&self) -> bool {
        self.last_error
            .as_ref()
            .is_some_and(ImportFailure::is_request_failure)
    }

    pub fn any_request_in_progress(&self) -> bool {
        self.upload_in_flight || self.poll_in_flight
    }

    pub fn is_loading_denied(&self) -> bool {
        self.last_error
            .as_ref()
            .is_some_and(ImportFailure::is_access_denied)
    }

    /// Server-supplied message, else `default_error`; empty if nothing failed
    pub fn formatted_error_message(&self, default_error: &str) -> String {
        match &self.last_error {
            Some(failure) if failure.is_request_failure() => failure
                .server_message()
                .unwrap_or(default_error)
                .to_string(),
            _ => String::new(),
        }
    }

    /// Upload timestamp shown next to SUCCESS
    ///
    /// Set when the upload is accepted or a record is restored, before any
    /// poll. Only meaningful once the stage reaches `Success`.
    pub fn success_date(&self) -> Option<DateTime<Utc>> {
        self.success_date
    }

    pub fn is_terminal(&self) -> bool {
        self.stage == ImportStage::Success || self.last_error.is_some()
    }

    /// Whether the file picker is offered
    ///
    /// An access-denied poll keeps it closed, since the page is replaced by
    /// the denial view. `ImportOrchestrator::start_import` does not consult
    /// this; an explicit trigger always starts a fresh session.
    pub fn accepts_new_upload(&self) -> bool {
        !self.triggered || self.stage == ImportStage::Success || self.any_request_failed()
    }

    /// Read-only view for consumers
    pub fn snapshot(&self, default_error: &str) -> ImportSnapshot {
        ImportSnapshot {
            import_triggered: self.triggered,
            file_name: self.file_name.clone(),
            current_stage: self.stage,
            failed_stage: self.failed_stage,
            upload_progress: self.upload_progress,
            polling_enabled: self.polling_enabled,
            any_request_failed: self.any_request_failed(),
            any_request_in_progress: self.any_request_in_progress(),
            is_loading_denied: self.is_loading_denied(),
            formatted_error_message: self.formatted_error_message(default_error),
            success_date: self.success_date(),
            accepts_new_upload: self.accepts_new_upload(),
            is_terminal: self.is_terminal(),
        }
    }
}

/// Derived, read-only view of an [`ImportSession`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSnapshot {
    pub import_triggered: bool,
    pub file_name: Option<FileName>,
    pub current_stage: ImportStage,
    pub failed_stage: Option<ImportStage>,
    pub upload_progress: u8,
    pub polling_enabled: bool,
    pub any_request_failed: bool,
    pub any_request_in_progress: bool,
    pub is_loading_denied: bool,
    pub formatted_error_message: String,
    pub success_date: Option<DateTime<Utc>>,
    pub accepts_new_upload: bool,
    pub is_terminal: bool,
}

impl ImportSnapshot {
    /// Nothing left to wait for: terminal, or idle with polling off
    pub fn is_settled(&self) -> bool {
        self.is_terminal || (!self.polling_enabled && !self.any_request_in_progress)
    }
}
