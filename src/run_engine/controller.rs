//! Batch loop driving a validation run
//!
//! URLs are split into batches of `concurrency_limit`. A batch runs fully in
//! parallel, one session per URL; batches run one after another with a
//! random pause in between. Stop and pause are observed only between
//! batches, so in-flight URLs always finish.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, error, info, warn};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::page_processor::{ProcessedPage, process_url};
use super::progress::{ProgressEvent, ProgressReporter, deliver};
use super::result::{ResultStatus, ValidationResult};
use super::run_state::{RunHandle, RunState};
use super::summary::{RunOutcome, RunSummary};
use crate::config::{SettingsError, ValidationSettings};
use crate::session::SessionFactory;
use crate::utils::{MAX_DELAY_SEC, PAUSE_POLL_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("a run is already active on this handle")]
    AlreadyRunning,

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Every emitted result plus the aggregate summary
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub results: Vec<ValidationResult>,
    pub summary: RunSummary,
}

/// Runs URL lists through sessions produced by one factory
pub struct RunController<F> {
    factory: Arc<F>,
}

impl<F> Clone for RunController<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<F: SessionFactory> RunController<F> {
    pub fn new(factory: F) -> Self {
        Self::from_shared(Arc::new(factory))
    }

    pub fn from_shared(factory: Arc<F>) -> Self {
        Self { factory }
    }

    /// Process `urls` to completion, stop or failure
    ///
    /// `handle` moves from idle to running for the duration of the call and
    /// is idle again when it returns. `progress` sees every URL exactly once.
    pub async fn run<P>(
        &self,
        urls: Vec<String>,
        settings: ValidationSettings,
        handle: &RunHandle,
        progress: &P,
    ) -> Result<RunReport, RunError>
    where
        P: ProgressReporter + ?Sized,
    {
        settings.validate()?;
        if !handle.shared().begin() {
            return Err(RunError::AlreadyRunning);
        }
        Ok(self.run_claimed(urls, settings, handle, progress).await)
    }

    /// Body of [`run`](Self::run) for a handle the caller already moved to running
    pub(crate) async fn run_claimed<P>(
        &self,
        urls: Vec<String>,
        settings: ValidationSettings,
        handle: &RunHandle,
        progress: &P,
    ) -> RunReport
    where
        P: ProgressReporter + ?Sized,
    {
        let state = handle.shared();
        let _idle_on_exit = ResetOnDrop(state);

        let started = Instant::now();
        let mut results = Vec::with_capacity(urls.len());
        let outcome = self
            .drive(&urls, Arc::new(settings), state, progress, &mut results)
            .await;

        match &outcome {
            RunOutcome::Completed => info!("Run completed: {} URLs", results.len()),
            RunOutcome::Stopped => info!(
                "Run stopped after {}/{} URLs",
                results.len(),
                urls.len()
            ),
            RunOutcome::Failed { error } => error!("Run failed: {error}"),
        }

        let summary = RunSummary::from_results(&results, outcome, started.elapsed());
        RunReport { results, summary }
    }

    async fn drive<P>(
        &self,
        urls: &[String],
        settings: Arc<ValidationSettings>,
        state: &RunState,
        progress: &P,
        results: &mut Vec<ValidationResult>,
    ) -> RunOutcome
    where
        P: ProgressReporter + ?Sized,
    {
        if let Err(e) = self.factory.preflight().await {
            return RunOutcome::Failed {
                error: e.to_string(),
            };
        }

        let total = urls.len();
        let batch_size = settings.concurrency_limit();
        let batch_count = total.div_ceil(batch_size);

        for (index, batch) in urls.chunks(batch_size).enumerate() {
            if index > 0 && !inter_batch_delay(state, &settings).await {
                return RunOutcome::Stopped;
            }
            if !wait_for_dispatch(state).await {
                return RunOutcome::Stopped;
            }

            debug!(
                "Dispatching batch {}/{} ({} URLs)",
                index + 1,
                batch_count,
                batch.len()
            );

            let engine_lost = self
                .run_batch(batch, &settings, total, progress, results)
                .await;
            if let Some(error) = engine_lost {
                return RunOutcome::Failed { error };
            }
        }

        RunOutcome::Completed
    }

    /// Returns the engine failure message if any session reported one
    async fn run_batch<P>(
        &self,
        batch: &[String],
        settings: &Arc<ValidationSettings>,
        total: usize,
        progress: &P,
        results: &mut Vec<ValidationResult>,
    ) -> Option<String>
    where
        P: ProgressReporter + ?Sized,
    {
        let batch_started = Instant::now();
        let mut in_flight: FuturesUnordered<_> = batch
            .iter()
            .map(|url| {
                let factory = Arc::clone(&self.factory);
                let settings = Arc::clone(settings);
                let url = url.clone();
                let task_url = url.clone();
                let task =
                    tokio::spawn(async move { process_url(&*factory, &task_url, &settings).await });
                async move { (url, task.await) }
            })
            .collect();

        let mut engine_lost = None;
        while let Some((url, joined)) = in_flight.next().await {
            let page = joined.unwrap_or_else(|e| {
                error!("Processing task for {url} failed: {e}");
                ProcessedPage {
                    result: ValidationResult::failed(
                        url.clone(),
                        ResultStatus::Error,
                        format!("processing task failed: {e}"),
                        batch_started.elapsed(),
                    ),
                    engine_unavailable: false,
                }
            });

            if page.engine_unavailable && engine_lost.is_none() {
                engine_lost = page.result.error.clone();
            }

            let event = ProgressEvent {
                url,
                result: page.result,
                processed_count: results.len() + 1,
                total_count: total,
            };
            if let Err(e) = deliver(progress, &event) {
                warn!("Progress callback failed for {}: {e}", event.url);
            }
            results.push(event.result);
        }

        engine_lost
    }
}

struct ResetOnDrop<'a>(&'a RunState);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

/// Wait out a pause; false once a stop has been requested
async fn wait_for_dispatch(state: &RunState) -> bool {
    let poll = Duration::from_millis(PAUSE_POLL_INTERVAL_MS);
    let mut announced = false;
    loop {
        if state.stop_requested() {
            return false;
        }
        if !state.is_paused() {
            if announced {
                info!("Run resumed");
            }
            return true;
        }
        if !announced {
            info!("Run paused");
            announced = true;
        }
        tokio::time::sleep(poll).await;
    }
}

/// Random pause between batches, cut short by a stop request
async fn inter_batch_delay(state: &RunState, settings: &ValidationSettings) -> bool {
    let delay = draw_delay(settings.delay_range());
    debug!("Waiting {:.2}s before next batch", delay.as_secs_f64());

    let poll = Duration::from_millis(PAUSE_POLL_INTERVAL_MS);
    let deadline = Instant::now() + delay;
    loop {
        if state.stop_requested() {
            return false;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }
        tokio::time::sleep(remaining.min(poll)).await;
    }
}

fn draw_delay((min, max): (f64, f64)) -> Duration {
    let secs = if max > min {
        rand::rng().random_range(min..=max)
    } else {
        min
    };
    Duration::try_from_secs_f64(secs.clamp(0.0, MAX_DELAY_SEC)).unwrap_or(Duration::ZERO)
}
