//! Shared control flags for one run
//!
//! The controller loop reads the flags at batch boundaries; the outside world
//! flips them through a [`RunHandle`]. Every flag is an atomic so neither side
//! ever blocks the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub(crate) struct RunState {
    running: AtomicBool,
    paused: AtomicBool,
    stop_requested: AtomicBool,
}

impl RunState {
    /// `Idle -> Running`; returns false if a run is already active
    pub(crate) fn begin(&self) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.paused.store(false, Ordering::Release);
        self.stop_requested.store(false, Ordering::Release);
        true
    }

    /// Back to `Idle` once the controller loop has finished
    pub(crate) fn reset(&self) {
        self.paused.store(false, Ordering::Release);
        self.stop_requested.store(false, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    fn pause(&self) {
        if self.is_running() && !self.stop_requested() {
            self.paused.store(true, Ordering::Release);
        }
    }

    fn resume(&self) {
        if self.is_running() {
            self.paused.store(false, Ordering::Release);
        }
    }

    fn stop(&self) {
        if self.is_running() {
            self.stop_requested.store(true, Ordering::Release);
            self.paused.store(false, Ordering::Release);
        }
    }

    fn snapshot(&self) -> RunStateSnapshot {
        RunStateSnapshot {
            running: self.is_running(),
            paused: self.is_paused(),
            stop_requested: self.stop_requested(),
        }
    }
}

/// Point-in-time view of a run's control flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStateSnapshot {
    pub running: bool,
    pub paused: bool,
    pub stop_requested: bool,
}

impl RunStateSnapshot {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.running
    }
}

/// Control surface for one run
///
/// Cheap to clone and safe to use from any task. Every method is a no-op
/// when no run is active on this handle.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    state: Arc<RunState>,
}

impl RunHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop dispatching new batches until [`resume`](Self::resume)
    pub fn pause(&self) {
        self.state.pause();
    }

    pub fn resume(&self) {
        self.state.resume();
    }

    /// Finish in-flight URLs and end the run; overrides a pending pause
    pub fn stop(&self) {
        self.state.stop();
    }

    #[must_use]
    pub fn state(&self) -> RunStateSnapshot {
        self.state.snapshot()
    }

    pub(crate) fn shared(&self) -> &RunState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_noops_when_idle() {
        let handle = RunHandle::new();
        handle.pause();
        handle.stop();
        handle.resume();
        assert_eq!(handle.state(), RunStateSnapshot::default());
        assert!(handle.state().is_idle());
    }

    #[test]
    fn pause_resume_round_trip() {
        let handle = RunHandle::new();
        assert!(handle.shared().begin());
        handle.pause();
        assert!(handle.state().paused);
        handle.resume();
        assert!(!handle.state().paused);
        assert!(handle.state().running);
    }

    #[test]
    fn stop_clears_pause_and_blocks_new_pause() {
        let handle = RunHandle::new();
        handle.shared().begin();
        handle.pause();
        handle.stop();
        let state = handle.state();
        assert!(state.stop_requested);
        assert!(!state.paused);

        handle.pause();
        assert!(!handle.state().paused);
    }

    #[test]
    fn begin_is_exclusive_until_reset() {
        let handle = RunHandle::new();
        assert!(handle.shared().begin());
        assert!(!handle.shared().begin());
        handle.stop();
        handle.shared().reset();
        assert_eq!(handle.state(), RunStateSnapshot::default());
        assert!(handle.shared().begin());
        assert!(!handle.state().stop_requested);
    }
}
