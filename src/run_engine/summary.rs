//! Aggregate statistics for a finished run

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::result::{ResultStatus, ValidationResult};

/// How the run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Stopped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub counts: BTreeMap<&'static str, usize>,
    pub schema_found: usize,
    /// Percentage of results with `success` status, one decimal
    pub success_rate: f64,
    /// Percentage of results with a Product candidate, one decimal
    pub schema_rate: f64,
    /// Mean score over results carrying a verdict, one decimal
    pub avg_score: f64,
    pub total_response_time_secs: f64,
    pub avg_response_time_secs: f64,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub duration_secs: f64,
}

impl RunSummary {
    #[must_use]
    pub fn from_results(results: &[ValidationResult], outcome: RunOutcome, duration: Duration) -> Self {
        let total = results.len();

        let mut counts: BTreeMap<&'static str, usize> = ResultStatus::ALL
            .iter()
            .map(|status| (status.as_str(), 0))
            .collect();
        for result in results {
            *counts.entry(result.status.as_str()).or_default() += 1;
        }

        let success = results
            .iter()
            .filter(|r| r.status == ResultStatus::Success)
            .count();
        let schema_found = results.iter().filter(|r| r.schema_found).count();
        let scores: Vec<f64> = results.iter().filter_map(ValidationResult::score).collect();
        let total_response: f64 = results.iter().map(|r| r.response_time.as_secs_f64()).sum();

        Self {
            total,
            schema_found,
            success_rate: percentage(success, total),
            schema_rate: percentage(schema_found, total),
            avg_score: round1(mean(scores.iter().sum(), scores.len())),
            total_response_time_secs: total_response,
            avg_response_time_secs: mean(total_response, total),
            counts,
            outcome,
            duration_secs: duration.as_secs_f64(),
        }
    }

    #[must_use]
    pub fn count(&self, status: ResultStatus) -> usize {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }
}

fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn percentage(part: usize, total: usize) -> f64 {
    round1(mean(part as f64 * 100.0, total))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
