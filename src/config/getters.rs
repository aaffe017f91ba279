//! Getter methods for `ValidationSettings`

use std::time::Duration;

use super::types::{StatusPolicy, UserAgentMode, ValidationSettings};

impl ValidationSettings {
    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_millis(self.nav_timeout_ms)
    }

    /// Inter-batch delay bounds in seconds, `(min, max)`
    #[must_use]
    pub fn delay_range(&self) -> (f64, f64) {
        (self.delay_min_sec, self.delay_max_sec)
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Number of navigation attempts a session makes per URL
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    #[must_use]
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    #[must_use]
    pub fn user_agent_mode(&self) -> &UserAgentMode {
        &self.user_agent_mode
    }

    #[must_use]
    pub fn stealth_mode(&self) -> bool {
        self.stealth_mode
    }

    #[must_use]
    pub fn block_resources(&self) -> bool {
        self.block_resources
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }
}
