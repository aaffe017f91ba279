//! Configuration module for validation runs
//!
//! This module provides `ValidationSettings` and its builder for configuring
//! runs with validation and the defaults the dashboard ships with.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ValidationSettingsBuilder;
pub use types::{SettingsError, StatusPolicy, UserAgentMode, ValidationSettings};
