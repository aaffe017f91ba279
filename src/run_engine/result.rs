//! Per-URL result records
//!
//! The serialized shape is the raw record the dashboard stores and exports:
//! the candidate sits under `schema_data`, the verdict under `validation`
//! and `response_time` is in seconds.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StatusPolicy;
use crate::markup::{Extraction, MarkupFormat, ProductCandidate};
use crate::validation::{NO_SCHEMA_MESSAGE, ValidationVerdict};

/// Columns of the flat CSV export, in order
pub const CSV_COLUMNS: [&str; 8] = [
    "url",
    "status",
    "schema_found",
    "score",
    "errors",
    "warnings",
    "response_time",
    "timestamp",
];

/// Terminal classification of one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Warning,
    Error,
    Blocked,
    NoSchema,
}

impl ResultStatus {
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Blocked,
        Self::NoSchema,
    ];

    /// Status of a page whose candidate produced `verdict`
    #[must_use]
    pub fn for_verdict(verdict: &ValidationVerdict, policy: StatusPolicy) -> Self {
        match policy {
            StatusPolicy::Strict if !verdict.valid => Self::Error,
            StatusPolicy::Strict if verdict.warnings.is_empty() => Self::Success,
            StatusPolicy::Strict => Self::Warning,
            StatusPolicy::Lenient if verdict.valid => Self::Success,
            StatusPolicy::Lenient => Self::Warning,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Blocked => "blocked",
            Self::NoSchema => "no_schema",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one URL in one run; immutable once emitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub status: ResultStatus,
    pub schema_found: bool,
    #[serde(rename = "schema_data")]
    pub candidate: Option<ProductCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_format: Option<MarkupFormat>,
    #[serde(rename = "validation")]
    pub verdict: Option<ValidationVerdict>,
    pub error: Option<String>,
    #[serde(with = "seconds")]
    pub response_time: Duration,
}

impl ValidationResult {
    /// A page that yielded a candidate
    #[must_use]
    pub fn validated(
        url: impl Into<String>,
        extraction: Extraction,
        verdict: ValidationVerdict,
        policy: StatusPolicy,
        response_time: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            status: ResultStatus::for_verdict(&verdict, policy),
            schema_found: true,
            candidate: Some(extraction.candidate),
            markup_format: Some(extraction.format),
            verdict: Some(verdict),
            error: None,
            response_time,
        }
    }

    /// A page that loaded but carried no `Product` markup
    #[must_use]
    pub fn no_schema(url: impl Into<String>, response_time: Duration) -> Self {
        Self::unvalidated(
            url,
            ResultStatus::NoSchema,
            NO_SCHEMA_MESSAGE.to_string(),
            response_time,
        )
    }

    /// A page that could not be reached, read or was refused
    #[must_use]
    pub fn failed(
        url: impl Into<String>,
        status: ResultStatus,
        message: impl Into<String>,
        response_time: Duration,
    ) -> Self {
        Self::unvalidated(url, status, message.into(), response_time)
    }

    fn unvalidated(
        url: impl Into<String>,
        status: ResultStatus,
        message: String,
        response_time: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            status,
            schema_found: false,
            candidate: None,
            markup_format: None,
            verdict: None,
            error: Some(message),
            response_time,
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.verdict.as_ref().map(|v| v.score)
    }

    /// Values for [`CSV_COLUMNS`]
    ///
    /// Results without a verdict report their failure message as the errors
    /// column and a score of 0.
    #[must_use]
    pub fn csv_row(&self) -> [String; 8] {
        let (errors, warnings) = match &self.verdict {
            Some(verdict) => (
                verdict.error_messages().join("; "),
                verdict.warning_messages().join("; "),
            ),
            None => (self.error.clone().unwrap_or_default(), String::new()),
        };

        [
            self.url.clone(),
            self.status.to_string(),
            self.schema_found.to_string(),
            format!("{:.1}", self.score().unwrap_or(0.0)),
            errors,
            warnings,
            format!("{:.3}", self.response_time.as_secs_f64()),
            self.timestamp.to_rfc3339(),
        ]
    }

    /// [`csv_row`](Self::csv_row) as one RFC 4180 line, without terminator
    #[must_use]
    pub fn csv_line(&self) -> String {
        self.csv_row()
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize a `Duration` as fractional seconds
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
