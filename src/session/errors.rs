//! Error types for the browser session layer

use std::time::Duration;

use thiserror::Error;

use crate::validation::HelpTopic;

/// Failure to reach a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// DNS, connection, TLS or CDP transport failure
    #[error("navigation to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("navigation to {url} timed out after {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },

    /// The document response carried an error status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl NavigationError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failures, timeouts, 5xx and 429 are worth another attempt
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        }
    }

    #[must_use]
    pub fn help_topic(&self) -> Option<HelpTopic> {
        match self {
            Self::Timeout { .. } => Some(HelpTopic::Timeout),
            Self::HttpStatus { status, .. } => HelpTopic::for_http_status(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Failure to acquire, configure or read a browser session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No usable rendering engine; ends the whole run
    #[error("browser engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to configure page: {0}")]
    Configure(String),

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("session already closed")]
    Closed,
}

impl SessionError {
    /// Build from an anyhow chain, keeping its context
    pub(crate) fn launch(err: &anyhow::Error) -> Self {
        Self::Launch(format!("{err:#}"))
    }

    pub(crate) fn configure(err: &anyhow::Error) -> Self {
        Self::Configure(format!("{err:#}"))
    }
}
