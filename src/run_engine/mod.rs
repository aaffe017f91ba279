//! Run controller: batches, pause/resume/stop and per-URL progress
//!
//! ```text
//! Idle -> Running -> {Paused <-> Running} -> {Completed | Stopped | Failed}
//! ```
//!
//! A run is driven by [`RunController::run`] and steered through its
//! [`RunHandle`]; [`RunManager`] tracks several runs by id.

pub mod challenge;
mod controller;
mod manager;
mod page_processor;
mod progress;
mod result;
mod run_state;
mod summary;

pub use controller::{RunController, RunError, RunReport};
pub use manager::{RunInfo, RunManager};
pub use progress::{ChannelProgress, NoOpProgress, ProgressError, ProgressEvent, ProgressReporter};
pub use result::{CSV_COLUMNS, ResultStatus, ValidationResult};
pub use run_state::{RunHandle, RunStateSnapshot};
pub use summary::{RunOutcome, RunSummary};
