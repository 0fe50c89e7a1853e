//! Terminal rendering of import progress
//!
//! Shared by `import` and `status`: follows an orchestrator's watcher,
//! prints the stepper whenever it changes and maps the final snapshot to an
//! exit code.

use crate::core::import::{ImportOrchestrator, ImportSnapshot};
use crate::core::stepper::{page, PageView, StepState, StepperLabels};
use tokio::sync::watch;

/// Exit code for a job that failed
pub const EXIT_JOB_FAILED: i32 = 1;
/// Exit code for a configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the status request was refused
pub const EXIT_ACCESS_DENIED: i32 = 3;
/// Exit code when the user interrupted the wait
pub const EXIT_INTERRUPTED: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;

/// Prints the stepper, skipping frames identical to the previous one
pub struct ProgressRenderer {
    labels: StepperLabels,
    last: Vec<String>,
}

impl ProgressRenderer {
    pub fn new(labels: StepperLabels) -> Self {
        Self {
            labels,
            last: Vec::new(),
        }
    }

    pub fn render(&mut self, snapshot: &ImportSnapshot) {
        let lines = frame(snapshot, &self.labels);
        if lines != self.last {
            for line in &lines {
                println!("{line}");
            }
            println!();
            self.last = lines;
        }
    }
}

/// Lines for one snapshot
pub fn frame(snapshot: &ImportSnapshot, labels: &StepperLabels) -> Vec<String> {
    match page(snapshot, labels) {
        PageView::AccessDenied => vec![
            "❌ Access denied while loading import status".to_string(),
            "   Check that your token can import into this course".to_string(),
        ],
        PageView::Idle => vec!["No import in progress".to_string()],
        PageView::Stepper(view) => {
            let mut lines = vec![format!("📦 {}", view.header)];
            for step in &view.steps {
                let marker = match step.state {
                    StepState::Done => "✅",
                    StepState::Active => "🔄",
                    StepState::Error => "❌",
                    StepState::Pending => "⬜",
                };
                let mut line = format!("  {marker} {}", step.title);
                if let Some(percent) = step.percent {
                    line.push_str(&format!(" ({percent}%)"));
                }
                lines.push(line);
                if let Some(message) = &step.error_message {
                    lines.push(format!("     Error: {message}"));
                }
            }
            if view.show_outline_link {
                lines.push(format!("  ➡️  {}", labels.view_outline));
            }
            lines
        }
    }
}

/// Exit code for a settled snapshot
pub fn exit_code(snapshot: &ImportSnapshot) -> i32 {
    if snapshot.is_loading_denied {
        EXIT_ACCESS_DENIED
    } else if snapshot.any_request_failed {
        EXIT_JOB_FAILED
    } else {
        0
    }
}

/// Renders until the session settles or `shutdown` fires
///
/// With `require_trigger`, an untriggered session does not count as settled.
/// Returns `None` when interrupted.
pub async fn follow(
    orchestrator: &ImportOrchestrator,
    renderer: &mut ProgressRenderer,
    mut shutdown: watch::Receiver<bool>,
    require_trigger: bool,
) -> anyhow::Result<Option<ImportSnapshot>> {
    let mut watcher = orchestrator.watch();

    loop {
        let snapshot = watcher.current();
        if snapshot.import_triggered || !require_trigger {
            renderer.render(&snapshot);
            if snapshot.is_settled() {
                return Ok(Some(snapshot));
            }
        }

        tokio::select! {
            changed = watcher.changed() => {
                changed?;
            }
            _ = shutdown.changed() => {
                orchestrator.stop_polling();
                return Ok(None);
            }
        }
    }
}
