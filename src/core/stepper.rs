//! Stepper projection
//!
//! Turns an [`ImportSnapshot`] into the five-step progress view shown while
//! an import runs: one step per server stage from `Uploading` to `Success`.

use crate::core::import::ImportSnapshot;
use crate::domain::ImportStage;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Visual state of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Active,
    Done,
    Error,
}

/// Title and description for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLabel {
    pub title: String,
    pub description: String,
}

impl StepLabel {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Text used by [`project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepperLabels {
    pub header: String,
    pub uploading: StepLabel,
    pub unpacking: StepLabel,
    pub verifying: StepLabel,
    pub updating: StepLabel,
    pub success: StepLabel,
    pub view_outline: String,
}

impl StepperLabels {
    fn for_stage(&self, stage: ImportStage) -> &StepLabel {
        match stage {
            ImportStage::Initial | ImportStage::Uploading => &self.uploading,
            ImportStage::Unpacking => &self.unpacking,
            ImportStage::Verifying => &self.verifying,
            ImportStage::Updating => &self.updating,
            ImportStage::Success => &self.success,
        }
    }
}

impl Default for StepperLabels {
    fn default() -> Self {
        Self {
            header: "Course import status".to_string(),
            uploading: StepLabel::new("Uploading", "Transferring your file to our servers"),
            unpacking: StepLabel::new(
                "Unpacking",
                "Expanding and preparing folder/file structure (You can now leave this page \
                 safely, but avoid making drastic changes to content until this import is \
                 complete)",
            ),
            verifying: StepLabel::new("Verifying", "Scanning for errors and other issues"),
            updating: StepLabel::new(
                "Updating course",
                "Integrating your imported content into this course. This process might take \
                 longer with larger files.",
            ),
            success: StepLabel::new(
                "Success",
                "Your imported content has now been integrated into this course",
            ),
            view_outline: "View updated outline".to_string(),
        }
    }
}

/// One rendered step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub stage: ImportStage,
    pub title: String,
    pub description: String,
    pub state: StepState,
    /// Upload percentage, only on an active, healthy upload step
    pub percent: Option<u8>,
    pub error_message: Option<String>,
}

/// Rendered stepper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepperView {
    pub header: String,
    pub steps: Vec<StepView>,
    pub show_outline_link: bool,
}

/// What the import page shows for a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// The status request was refused
    AccessDenied,
    /// Nothing running; only the file picker
    Idle,
    /// An import is tracked
    Stepper(StepperView),
}

/// Page-level projection
pub fn page(snapshot: &ImportSnapshot, labels: &StepperLabels) -> PageView {
    if snapshot.is_loading_denied {
        PageView::AccessDenied
    } else if snapshot.import_triggered {
        PageView::Stepper(project(snapshot, labels))
    } else {
        PageView::Idle
    }
}

/// Projects the snapshot onto the five steps
pub fn project(snapshot: &ImportSnapshot, labels: &StepperLabels) -> StepperView {
    let failed = snapshot.any_request_failed;
    let active = snapshot.failed_stage.unwrap_or(snapshot.current_stage);

    let steps = ImportStage::ALL
        .iter()
        .copied()
        .filter(|stage| *stage != ImportStage::Initial)
        .map(|stage| {
            let state = step_state(stage, active, failed);
            let label = labels.for_stage(stage);

            let percent = (stage == ImportStage::Uploading
                && state == StepState::Active
                && snapshot.upload_progress != 0
                && snapshot.upload_progress != 100)
                .then_some(snapshot.upload_progress);

            let error_message = (state == StepState::Error
                && !snapshot.formatted_error_message.is_empty())
            .then(|| snapshot.formatted_error_message.clone());

            let title = match (stage, snapshot.success_date) {
                (ImportStage::Success, Some(date)) => {
                    format!("{} ({})", label.title, format_success_date(date))
                }
                _ => label.title.clone(),
            };

            StepView {
                stage,
                title,
                description: label.description.clone(),
                state,
                percent,
                error_message,
            }
        })
        .collect();

    StepperView {
        header: labels.header.clone(),
        steps,
        show_outline_link: snapshot.current_stage == ImportStage::Success,
    }
}

fn step_state(stage: ImportStage, active: ImportStage, failed: bool) -> StepState {
    let is_active = stage == active;
    if is_active && failed {
        StepState::Error
    } else if stage < active || (is_active && stage == ImportStage::Success) {
        StepState::Done
    } else if is_active {
        StepState::Active
    } else {
        StepState::Pending
    }
}

/// Short local date, e.g. `03/14/25, 4:07 PM`
pub fn format_success_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%m/%d/%y, %-I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileName;
    use test_case::test_case;

    fn snapshot(stage: ImportStage) -> ImportSnapshot {
        ImportSnapshot {
            import_triggered: true,
            file_name: Some(FileName::new("course.tar.gz").unwrap()),
            current_stage: stage,
            failed_stage: None,
            upload_progress: 0,
            polling_enabled: true,
            any_request_failed: false,
            any_request_in_progress: false,
            is_loading_denied: false,
            formatted_error_message: String::new(),
            success_date: None,
            accepts_new_upload: false,
            is_terminal: false,
        }
    }

    fn states(view: &StepperView) -> Vec<StepState> {
        view.steps.iter().map(|s| s.state).collect()
    }

    #[test_case(ImportStage::Uploading, false, StepState::Active)]
    #[test_case(ImportStage::Uploading, true, StepState::Error)]
    #[test_case(ImportStage::Verifying, false, StepState::Done)]
    #[test_case(ImportStage::Verifying, true, StepState::Done)]
    fn test_step_state_for_uploading(active: ImportStage, failed: bool, expected: StepState) {
        assert_eq!(step_state(ImportStage::Uploading, active, failed), expected);
    }

    #[test]
    fn test_mid_import_states() {
        let view = project(&snapshot(ImportStage::Verifying), &StepperLabels::default());

        assert_eq!(view.steps.len(), 5);
        assert_eq!(
            states(&view),
            vec![
                StepState::Done,
                StepState::Done,
                StepState::Active,
                StepState::Pending,
                StepState::Pending
            ]
        );
        assert!(!view.show_outline_link);
    }

    #[test]
    fn test_upload_percent_shown_only_mid_upload() {
        let labels = StepperLabels::default();
        let mut snap = snapshot(ImportStage::Uploading);

        snap.upload_progress = 42;
        assert_eq!(project(&snap, &labels).steps[0].percent, Some(42));

        snap.upload_progress = 100;
        assert_eq!(project(&snap, &labels).steps[0].percent, None);

        snap.upload_progress = 42;
        snap.any_request_failed = true;
        assert_eq!(project(&snap, &labels).steps[0].percent, None);
    }

    #[test]
    fn test_failed_stage_marks_error_step() {
        let mut snap = snapshot(ImportStage::Unpacking);
        snap.failed_stage = Some(ImportStage::Verifying);
        snap.any_request_failed = true;
        snap.formatted_error_message = "Invalid OLX".to_string();

        let view = project(&snap, &StepperLabels::default());

        assert_eq!(
            states(&view),
            vec![
                StepState::Done,
                StepState::Done,
                StepState::Error,
                StepState::Pending,
                StepState::Pending
            ]
        );
        assert_eq!(view.steps[2].error_message.as_deref(), Some("Invalid OLX"));
    }

    #[test]
    fn test_success_is_done_and_dated() {
        let mut snap = snapshot(ImportStage::Success);
        snap.success_date = Some(Utc::now());

        let view = project(&snap, &StepperLabels::default());

        assert!(states(&view).iter().all(|s| *s == StepState::Done));
        assert!(view.steps[4].title.starts_with("Success ("));
        assert!(view.show_outline_link);
    }

    #[test]
    fn test_date_hidden_until_success() {
        let mut snap = snapshot(ImportStage::Verifying);
        snap.success_date = Some(Utc::now());

        let view = project(&snap, &StepperLabels::default());

        assert!(view.steps.iter().all(|s| !s.title.contains('(')));
    }

    #[test]
    fn test_restored_before_first_poll_has_no_active_step() {
        let view = project(&snapshot(ImportStage::Initial), &StepperLabels::default());
        assert!(states(&view).iter().all(|s| *s == StepState::Pending));
    }

    #[test]
    fn test_page_view() {
        let labels = StepperLabels::default();
        let mut snap = snapshot(ImportStage::Uploading);
        assert!(matches!(page(&snap, &labels), PageView::Stepper(_)));

        snap.is_loading_denied = true;
        assert_eq!(page(&snap, &labels), PageView::AccessDenied);

        snap.is_loading_denied = false;
        snap.import_triggered = false;
        assert_eq!(page(&snap, &labels), PageView::Idle);
    }
}
