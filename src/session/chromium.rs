//! Chromium-backed sessions driven over CDP
//!
//! Every session is its own browser process with a throwaway profile
//! directory, a fresh user agent and the stealth countermeasures installed
//! before the first navigation.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    self, EventResponseReceived, Headers, ResourceType, SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::{FrameId, NavigateParams};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::{Browser, Page};
use futures::{FutureExt, StreamExt};
use tempfile::TempDir;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::{
    NavigationError, PageLoad, RenderSession, SessionError, SessionFactory, identity,
    resource_blocking,
};
use crate::browser_setup::{self, LaunchOptions};
use crate::config::ValidationSettings;
use crate::kromekover::{self, StealthLevel, StealthProfile};
use crate::utils::{READY_STATE_POLL_INTERVAL_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

const READY_STATE_SCRIPT: &str = "document.readyState";

/// Launches one Chromium process per session
///
/// The executable is resolved once, on preflight or first open, and reused.
#[derive(Debug, Default)]
pub struct ChromiumSessionFactory {
    executable: OnceCell<PathBuf>,
}

impl ChromiumSessionFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a known executable instead of searching for one
    #[must_use]
    pub fn with_executable(path: PathBuf) -> Self {
        Self {
            executable: OnceCell::new_with(Some(path)),
        }
    }

    async fn executable(&self) -> Result<&PathBuf, SessionError> {
        self.executable
            .get_or_try_init(|| async {
                browser_setup::resolve_browser_executable()
                    .await
                    .map_err(|e| SessionError::EngineUnavailable(format!("{e:#}")))
            })
            .await
    }
}

impl SessionFactory for ChromiumSessionFactory {
    type Session = ChromiumSession;

    async fn preflight(&self) -> Result<(), SessionError> {
        let path = self.executable().await?;
        info!("Using browser executable {}", path.display());
        Ok(())
    }

    async fn open(&self, settings: &ValidationSettings) -> Result<ChromiumSession, SessionError> {
        let executable = self.executable().await?.clone();
        let user_agent = identity::choose_user_agent(settings.user_agent_mode());

        let profile_dir = tempfile::Builder::new()
            .prefix("product-schema-validator-")
            .tempdir()
            .map_err(|e| SessionError::Launch(format!("failed to create profile directory: {e}")))?;

        let options = LaunchOptions {
            headless: settings.headless(),
            user_agent: user_agent.clone(),
            user_data_dir: profile_dir.path().to_path_buf(),
            request_timeout: settings.nav_timeout(),
        };

        let (browser, handler) = browser_setup::launch_browser(&executable, &options)
            .await
            .map_err(|e| SessionError::launch(&e))?;

        let mut session = ChromiumSession {
            browser: Some(browser),
            handler: Some(handler),
            page: None,
            blocker: None,
            profile_dir: Some(profile_dir),
            settle_delay: settings.settle_delay(),
            user_agent,
        };

        if let Err(e) = session.configure(settings).await {
            session.close().await;
            return Err(e);
        }

        debug!("Opened session with user agent {}", session.user_agent);
        Ok(session)
    }
}

/// One isolated Chromium process with a single configured page
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Option<Page>,
    blocker: Option<JoinHandle<()>>,
    profile_dir: Option<TempDir>,
    settle_delay: Duration,
    user_agent: String,
}

impl ChromiumSession {
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn configure(&mut self, settings: &ValidationSettings) -> Result<(), SessionError> {
        let browser = self.browser.as_ref().ok_or(SessionError::Closed)?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Configure(format!("failed to open page: {e}")))?;

        apply_viewport(&page)
            .await
            .map_err(|e| SessionError::configure(&e))?;
        apply_headers(&page, &self.user_agent)
            .await
            .map_err(|e| SessionError::configure(&e))?;

        let profile = StealthProfile::for_user_agent(&self.user_agent);
        let level = StealthLevel::from_stealth_mode(settings.stealth_mode());
        if let Err(e) = kromekover::inject(&page, &profile, level).await {
            warn!("Stealth injection failed, continuing without it: {e:#}");
        }

        if settings.block_resources() {
            let blocker = resource_blocking::enable(&page)
                .await
                .map_err(|e| SessionError::configure(&e))?;
            self.blocker = Some(blocker);
        }

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, SessionError> {
        self.page.as_ref().ok_or(SessionError::Closed)
    }

    fn transport(url: &str, err: impl std::fmt::Display) -> NavigationError {
        NavigationError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl RenderSession for ChromiumSession {
    async fn load(&mut self, url: &str, nav_timeout: Duration) -> Result<PageLoad, NavigationError> {
        let page = self.page().map_err(|e| Self::transport(url, e))?.clone();
        let started = Instant::now();

        let attempt = async {
            let mut responses = page
                .event_listener::<EventResponseReceived>()
                .await
                .map_err(|e| Self::transport(url, e))?;

            let navigated = page
                .execute(NavigateParams::new(url))
                .await
                .map_err(|e| Self::transport(url, e))?;
            if let Some(error_text) = navigated.result.error_text.clone() {
                return Err(Self::transport(url, error_text));
            }
            let frame_id = navigated.result.frame_id.clone();

            wait_for_dom_ready(&page).await;
            Ok::<_, NavigationError>(document_status(&mut responses, &frame_id))
        };

        let status = tokio::time::timeout(nav_timeout, attempt)
            .await
            .map_err(|_| NavigationError::Timeout {
                url: url.to_string(),
                after: nav_timeout,
            })??;

        if let Some(status) = status
            && status >= 400
        {
            return Err(NavigationError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        trace!(
            "DOM ready for {url} after {:.2}s, settling {}ms",
            started.elapsed().as_secs_f64(),
            self.settle_delay.as_millis()
        );
        tokio::time::sleep(self.settle_delay).await;

        let final_url = page.url().await.ok().flatten();
        Ok(PageLoad { status, final_url })
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        self.page()?
            .content()
            .await
            .map_err(|e| SessionError::Content(e.to_string()))
    }

    async fn close(&mut self) {
        if let Some(blocker) = self.blocker.take() {
            blocker.abort();
        }
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            trace!(target: "product_schema_validator::cleanup", "Page close failed: {e}");
        }

        if let Some(mut browser) = self.browser.take() {
            debug!(target: "product_schema_validator::cleanup", "Closing browser");
            if let Err(e) = browser.close().await {
                warn!(target: "product_schema_validator::cleanup", "Failed to close browser: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!(target: "product_schema_validator::cleanup", "Failed to wait for browser exit: {e}");
            }
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        if let Some(dir) = self.profile_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!(
                    target: "product_schema_validator::cleanup",
                    "Failed to remove profile directory {}: {e}",
                    path.display()
                );
            }
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(blocker) = self.blocker.take() {
            blocker.abort();
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if self.browser.is_some() {
            warn!("ChromiumSession dropped without close(); killing browser in Drop");
        }
        // Browser::drop kills the process and TempDir::drop removes the profile
    }
}

async fn apply_viewport(page: &Page) -> Result<()> {
    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(VIEWPORT_WIDTH))
            .height(i64::from(VIEWPORT_HEIGHT))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to set viewport")?;
    Ok(())
}

async fn apply_headers(page: &Page, user_agent: &str) -> Result<()> {
    page.execute(network::EnableParams::default())
        .await
        .context("Failed to enable network domain")?;
    page.execute(SetExtraHttpHeadersParams::new(Headers::new(
        identity::stealth_headers(user_agent),
    )))
    .await
    .context("Failed to set extra HTTP headers")?;
    Ok(())
}

/// Poll until the document is parsed; the caller bounds the wait
async fn wait_for_dom_ready(page: &Page) {
    let poll_interval = Duration::from_millis(READY_STATE_POLL_INTERVAL_MS);
    loop {
        match page.evaluate(READY_STATE_SCRIPT).await {
            Ok(result) => {
                if let Ok(state) = result.into_value::<String>()
                    && (state == "interactive" || state == "complete")
                {
                    return;
                }
            }
            Err(e) => trace!("readyState check failed: {e}, retrying"),
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Status of the main document response among the events seen so far
fn document_status(
    responses: &mut EventStream<EventResponseReceived>,
    frame_id: &FrameId,
) -> Option<u16> {
    while let Some(Some(event)) = responses.next().now_or_never() {
        if event.r#type == ResourceType::Document && event.frame_id.as_ref() == Some(frame_id) {
            return u16::try_from(event.response.status).ok();
        }
    }
    None
}
