//! Tracking of concurrently active runs
//!
//! Each run gets a UUID v4 id and its own [`RunHandle`]. Finished runs keep
//! their report until [`RunManager::remove`] is called.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::controller::{RunController, RunError, RunReport};
use super::progress::ProgressReporter;
use super::run_state::{RunHandle, RunStateSnapshot};
use crate::config::ValidationSettings;
use crate::session::SessionFactory;

/// Pre-allocated slots for tracked runs
const RUN_TABLE_INITIAL_CAPACITY: usize = 16;

struct TrackedRun {
    handle: RunHandle,
    started_at: DateTime<Utc>,
    task: Option<JoinHandle<()>>,
    report: Option<RunReport>,
}

/// Overview of one tracked run
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub state: RunStateSnapshot,
    pub finished: bool,
}

/// Starts runs in the background and routes control calls by run id
pub struct RunManager<F> {
    controller: RunController<F>,
    runs: Arc<Mutex<HashMap<String, TrackedRun>>>,
}

impl<F> Clone for RunManager<F> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            runs: Arc::clone(&self.runs),
        }
    }
}

impl<F: SessionFactory> RunManager<F> {
    pub fn new(factory: F) -> Self {
        Self::from_controller(RunController::new(factory))
    }

    pub fn from_controller(controller: RunController<F>) -> Self {
        Self {
            controller,
            runs: Arc::new(Mutex::new(HashMap::with_capacity(
                RUN_TABLE_INITIAL_CAPACITY,
            ))),
        }
    }

    /// Start a run on a background task
    ///
    /// The returned handle is already running, so control calls made right
    /// after `start` are never lost.
    pub async fn start(
        &self,
        urls: Vec<String>,
        settings: ValidationSettings,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<(String, RunHandle), RunError> {
        settings.validate()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let handle = RunHandle::new();
        if !handle.shared().begin() {
            return Err(RunError::AlreadyRunning);
        }

        let mut runs = self.runs.lock().await;
        let task = {
            let controller = self.controller.clone();
            let handle = handle.clone();
            let runs = Arc::clone(&self.runs);
            let run_id = run_id.clone();
            tokio::spawn(async move {
                let report = controller
                    .run_claimed(urls, settings, &handle, &*progress)
                    .await;
                if let Some(run) = runs.lock().await.get_mut(&run_id) {
                    run.report = Some(report);
                }
            })
        };

        log::info!("Started run {run_id}");
        runs.insert(
            run_id.clone(),
            TrackedRun {
                handle: handle.clone(),
                started_at: Utc::now(),
                task: Some(task),
                report: None,
            },
        );

        Ok((run_id, handle))
    }

    async fn with_handle(&self, run_id: &str, action: impl FnOnce(&RunHandle)) {
        let runs = self.runs.lock().await;
        if let Some(run) = runs.get(run_id) {
            action(&run.handle);
        }
    }

    pub async fn pause(&self, run_id: &str) {
        self.with_handle(run_id, RunHandle::pause).await;
    }

    pub async fn resume(&self, run_id: &str) {
        self.with_handle(run_id, RunHandle::resume).await;
    }

    pub async fn stop(&self, run_id: &str) {
        self.with_handle(run_id, RunHandle::stop).await;
    }

    /// Control flags of a run; idle for finished or unknown runs
    pub async fn state(&self, run_id: &str) -> RunStateSnapshot {
        let runs = self.runs.lock().await;
        runs.get(run_id)
            .map(|run| run.handle.state())
            .unwrap_or_default()
    }

    pub async fn list(&self) -> Vec<RunInfo> {
        let runs = self.runs.lock().await;
        runs.iter()
            .map(|(run_id, run)| RunInfo {
                run_id: run_id.clone(),
                started_at: run.started_at,
                state: run.handle.state(),
                finished: run.report.is_some(),
            })
            .collect()
    }

    /// Report of a finished run
    pub async fn report(&self, run_id: &str) -> Option<RunReport> {
        let runs = self.runs.lock().await;
        runs.get(run_id).and_then(|run| run.report.clone())
    }

    /// Wait for a run to finish and return its report
    pub async fn wait(&self, run_id: &str) -> Option<RunReport> {
        let task = {
            let mut runs = self.runs.lock().await;
            runs.get_mut(run_id).and_then(|run| run.task.take())
        };
        if let Some(task) = task
            && let Err(e) = task.await
        {
            log::error!("Run {run_id} task failed: {e}");
        }
        self.report(run_id).await
    }

    /// Forget a run, stopping it first if it is still active
    pub async fn remove(&self, run_id: &str) -> Option<RunReport> {
        let mut runs = self.runs.lock().await;
        let run = runs.remove(run_id)?;
        run.handle.stop();
        run.report
    }
}
