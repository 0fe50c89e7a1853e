//! Status poller
//!
//! A spawned task that fetches job status on a fixed interval until the
//! session it was armed for stops wanting it. Ticks never overlap: each one
//! waits for its response before the next is scheduled.

use super::failure::{ImportFailure, RequestKind};
use super::session::{ImportSession, PollOutcome};
use crate::adapters::studio::StatusTransport;
use crate::domain::{CourseId, FileName};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct StatusPoller {
    course_id: CourseId,
    transport: Arc<dyn StatusTransport>,
    state: Arc<watch::Sender<ImportSession>>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(
        course_id: CourseId,
        transport: Arc<dyn StatusTransport>,
        state: Arc<watch::Sender<ImportSession>>,
        interval: Duration,
    ) -> Self {
        Self {
            course_id,
            transport,
            state,
            interval,
        }
    }

    /// Starts polling for the session identified by `generation`
    pub fn spawn(self, generation: u64, file_name: FileName) -> JoinHandle<()> {
        tokio::spawn(self.run(generation, file_name))
    }

    async fn run(self, generation: u64, file_name: FileName) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks: u64 = 0;

        loop {
            ticker.tick().await;

            // Flag is read at fire time, never captured
            let armed = self
                .state
                .send_if_modified(|session| session.begin_poll(generation, &file_name));
            if !armed {
                break;
            }
            ticks += 1;

            let result = self.transport.fetch_status(&self.course_id, &file_name).await;

            let mut outcome = PollOutcome::Stale;
            self.state.send_modify(|session| {
                outcome = match &result {
                    Ok(response) => session.apply_status(generation, &file_name, response),
                    Err(e) => session.apply_status_error(
                        generation,
                        &file_name,
                        ImportFailure::classify(RequestKind::Status, e),
                    ),
                };
            });

            match &result {
                Ok(response) => tracing::debug!(
                    file_name = %file_name,
                    tick = ticks,
                    import_status = response.import_status,
                    "Status received"
                ),
                Err(e) => tracing::warn!(
                    file_name = %file_name,
                    tick = ticks,
                    error = %e,
                    "Status request failed"
                ),
            }

            if outcome != PollOutcome::Continue {
                break;
            }
        }

        tracing::debug!(
            file_name = %file_name,
            generation = generation,
            ticks = ticks,
            "Status polling stopped"
        );
    }
}
