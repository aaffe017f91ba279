//! Fluent builder for `ValidationSettings`
//!
//! Every field has a default, so the builder has no required state; `build()`
//! runs the same checks as `ValidationSettings::validate()`.

use super::types::{SettingsError, StatusPolicy, UserAgentMode, ValidationSettings};
use crate::utils::MAX_DELAY_SEC;

#[derive(Debug, Clone, Default)]
pub struct ValidationSettingsBuilder {
    pub(crate) settings: ValidationSettings,
}

impl ValidationSettings {
    /// Create a builder for configuring `ValidationSettings` with a fluent interface
    #[must_use]
    pub fn builder() -> ValidationSettingsBuilder {
        ValidationSettingsBuilder::default()
    }

    /// Builder seeded with these settings, e.g. to override a loaded file
    #[must_use]
    pub fn into_builder(self) -> ValidationSettingsBuilder {
        ValidationSettingsBuilder { settings: self }
    }

    /// Check invariants the run engine relies on
    ///
    /// Needed after deserializing settings from an external source; the
    /// builder calls it on `build()`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.concurrency_limit == 0 {
            return Err(SettingsError::ZeroConcurrency);
        }
        if self.nav_timeout_ms == 0 {
            return Err(SettingsError::ZeroNavTimeout);
        }
        let (min, max) = (self.delay_min_sec, self.delay_max_sec);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
            return Err(SettingsError::InvalidDelay { min, max });
        }
        if min > max {
            return Err(SettingsError::InvertedDelay { min, max });
        }
        if max > MAX_DELAY_SEC {
            return Err(SettingsError::DelayTooLong {
                max,
                limit: MAX_DELAY_SEC,
            });
        }
        Ok(())
    }
}

impl ValidationSettingsBuilder {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.settings.headless = headless;
        self
    }

    #[must_use]
    pub fn nav_timeout_ms(mut self, ms: u64) -> Self {
        self.settings.nav_timeout_ms = ms;
        self
    }

    /// Set the bounds of the uniform inter-batch delay, in seconds
    ///
    /// # Example
    /// ```rust
    /// # use product_schema_validator::config::ValidationSettings;
    /// let settings = ValidationSettings::builder()
    ///     .delay_range(0.5, 1.5)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(settings.delay_range(), (0.5, 1.5));
    /// ```
    #[must_use]
    pub fn delay_range(mut self, min_sec: f64, max_sec: f64) -> Self {
        self.settings.delay_min_sec = min_sec;
        self.settings.delay_max_sec = max_sec;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.settings.max_retries = retries;
        self
    }

    #[must_use]
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.settings.concurrency_limit = limit;
        self
    }

    #[must_use]
    pub fn user_agent_mode(mut self, mode: UserAgentMode) -> Self {
        self.settings.user_agent_mode = mode;
        self
    }

    #[must_use]
    pub fn stealth_mode(mut self, enabled: bool) -> Self {
        self.settings.stealth_mode = enabled;
        self
    }

    #[must_use]
    pub fn block_resources(mut self, enabled: bool) -> Self {
        self.settings.block_resources = enabled;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.settings.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn status_policy(mut self, policy: StatusPolicy) -> Self {
        self.settings.status_policy = policy;
        self
    }

    pub fn build(self) -> Result<ValidationSettings, SettingsError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
