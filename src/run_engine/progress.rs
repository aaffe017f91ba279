//! Per-URL progress reporting
//!
//! The controller calls [`ProgressReporter::report`] exactly once per URL,
//! in completion order. Reporter failures, panics included, are logged and
//! never stop the run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::result::ValidationResult;

/// One completed URL together with the run's counters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub url: String,
    pub result: ValidationResult,
    pub processed_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("progress receiver dropped")]
    ChannelClosed,

    #[error("progress callback panicked: {0}")]
    Panicked(String),

    #[error("progress sink failed: {0}")]
    Sink(String),
}

/// Receives one event per completed URL
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent) -> Result<(), ProgressError>;
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report(&self, _event: &ProgressEvent) -> Result<(), ProgressError> {
        Ok(())
    }
}

impl<F> ProgressReporter for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: &ProgressEvent) -> Result<(), ProgressError> {
        self(event);
        Ok(())
    }
}

/// Forwards events into an mpsc channel, e.g. towards a websocket sink
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    #[must_use]
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, event: &ProgressEvent) -> Result<(), ProgressError> {
        self.tx
            .send(event.clone())
            .map_err(|_| ProgressError::ChannelClosed)
    }
}

/// Deliver an event, turning a panicking reporter into an error
pub(crate) fn deliver<P: ProgressReporter + ?Sized>(
    reporter: &P,
    event: &ProgressEvent,
) -> Result<(), ProgressError> {
    match catch_unwind(AssertUnwindSafe(|| reporter.report(event))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(ProgressError::Panicked(message))
        }
    }
}
