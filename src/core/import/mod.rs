//! Import orchestration
//!
//! - [`session`] - the pure state machine and its derived snapshot
//! - [`failure`] - error classification
//! - [`poller`] - fixed-interval status polling task
//! - [`orchestrator`] - owner of a session, wiring transports and the store

pub mod failure;
pub mod orchestrator;
pub mod poller;
pub mod session;

pub use failure::{ImportFailure, RequestKind};
pub use orchestrator::{ImportOptions, ImportOrchestrator, ImportWatcher, DEFAULT_ERROR_MESSAGE};
pub use poller::StatusPoller;
pub use session::{ImportSession, ImportSnapshot, PollOutcome};
