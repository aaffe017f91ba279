//! Core configuration types for validation runs
//!
//! `ValidationSettings` is the settings record shared by the run engine and
//! the browser session layer. It deserializes from the dashboard's JSON with
//! either snake_case or camelCase keys, and every field has a default so a
//! partial record is accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_DELAY_MAX_SEC, DEFAULT_DELAY_MIN_SEC, DEFAULT_MAX_RETRIES,
    DEFAULT_NAV_TIMEOUT_MS, DEFAULT_SETTLE_DELAY_MS,
};

/// Settings for one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub(crate) headless: bool,

    /// Upper bound for a single navigation attempt, including the wait for
    /// the document to be parsed
    #[serde(alias = "navTimeoutMs")]
    pub(crate) nav_timeout_ms: u64,

    #[serde(alias = "delayMinSec")]
    pub(crate) delay_min_sec: f64,

    #[serde(alias = "delayMaxSec")]
    pub(crate) delay_max_sec: f64,

    /// Retries after the first navigation attempt (total attempts = retries + 1)
    #[serde(alias = "maxRetries")]
    pub(crate) max_retries: u32,

    /// Batch size; URLs inside a batch are processed in parallel
    #[serde(alias = "concurrencyLimit")]
    pub(crate) concurrency_limit: usize,

    #[serde(alias = "userAgentMode", alias = "user_agent")]
    pub(crate) user_agent_mode: UserAgentMode,

    #[serde(alias = "stealthMode")]
    pub(crate) stealth_mode: bool,

    #[serde(alias = "blockResources")]
    pub(crate) block_resources: bool,

    #[serde(alias = "settleDelayMs")]
    pub(crate) settle_delay_ms: u64,

    #[serde(alias = "statusPolicy")]
    pub(crate) status_policy: StatusPolicy,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            headless: true,
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            delay_min_sec: DEFAULT_DELAY_MIN_SEC,
            delay_max_sec: DEFAULT_DELAY_MAX_SEC,
            max_retries: DEFAULT_MAX_RETRIES,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            user_agent_mode: UserAgentMode::Random,
            stealth_mode: true,
            block_resources: true,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            status_policy: StatusPolicy::Strict,
        }
    }
}

/// How a session picks its user-agent string
///
/// Serialized as a plain string: `"random"`, `"fixed"`, or any other value,
/// which is used verbatim as a custom user agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserAgentMode {
    /// Uniform pick from the curated pool, per session
    #[default]
    Random,
    /// Always the first pool entry
    Fixed,
    /// Caller-supplied user agent
    Custom(String),
}

impl From<String> for UserAgentMode {
    fn from(value: String) -> Self {
        match value.trim() {
            "" | "random" => Self::Random,
            "fixed" => Self::Fixed,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

impl From<UserAgentMode> for String {
    fn from(mode: UserAgentMode) -> Self {
        match mode {
            UserAgentMode::Random => "random".to_string(),
            UserAgentMode::Fixed => "fixed".to_string(),
            UserAgentMode::Custom(ua) => ua,
        }
    }
}

/// Mapping from a validation verdict to a result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// `success` when valid without warnings, `warning` when valid with
    /// warnings, `error` when any validation error is present
    #[default]
    Strict,
    /// `success` when valid, otherwise `warning`
    Lenient,
}

/// Rejected settings values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("concurrency_limit must be at least 1")]
    ZeroConcurrency,

    #[error("nav_timeout_ms must be greater than 0")]
    ZeroNavTimeout,

    #[error("delay bounds must be finite and non-negative (got {min}..{max})")]
    InvalidDelay { min: f64, max: f64 },

    #[error("delay_min_sec ({min}) must not exceed delay_max_sec ({max})")]
    InvertedDelay { min: f64, max: f64 },

    #[error("delay_max_sec ({max}) exceeds the {limit}s limit")]
    DelayTooLong { max: f64, limit: f64 },
}
