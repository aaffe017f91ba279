//! Isolated browser sessions
//!
//! A [`SessionFactory`] hands out one [`RenderSession`] per URL. Sessions
//! never share cookies, storage or profile directories. The chromium
//! implementation lives in [`chromium`]; tests drive the run engine through
//! scripted fakes of the same traits.

use std::future::Future;
use std::time::Duration;

use crate::config::ValidationSettings;

pub mod chromium;
mod errors;
pub mod identity;
mod navigation;
pub mod resource_blocking;

pub use chromium::{ChromiumSession, ChromiumSessionFactory};
pub use errors::{NavigationError, SessionError};
pub use navigation::{navigate_with_retry, retry_backoff};

/// What a successful navigation observed about the main document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLoad {
    /// Status of the main document response, when one was seen
    pub status: Option<u16>,
    /// URL after redirects
    pub final_url: Option<String>,
}

/// Produces fresh, isolated sessions
pub trait SessionFactory: Send + Sync + 'static {
    type Session: RenderSession + 'static;

    /// Check that a rendering engine is available before any URL is processed
    fn preflight(&self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Launch a new session configured from the settings
    fn open(
        &self,
        settings: &ValidationSettings,
    ) -> impl Future<Output = Result<Self::Session, SessionError>> + Send;
}

/// One browser identity used for exactly one URL
pub trait RenderSession: Send {
    /// Single navigation attempt, bounded by `nav_timeout`
    fn load(
        &mut self,
        url: &str,
        nav_timeout: Duration,
    ) -> impl Future<Output = Result<PageLoad, NavigationError>> + Send;

    /// Rendered HTML of the current document
    fn content(&mut self) -> impl Future<Output = Result<String, SessionError>> + Send;

    /// Release every resource; calling twice is harmless
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
