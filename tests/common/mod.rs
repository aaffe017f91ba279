//! Test utilities for the validator test suite
//!
//! `ScriptedFactory` stands in for Chromium: every URL maps to a scripted
//! page (HTML, HTTP status, unreachable host, latency), and the factory
//! counts sessions so tests can check that every session gets closed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use product_schema_validator::session::{
    NavigationError, PageLoad, RenderSession, SessionError, SessionFactory,
};
use product_schema_validator::{ProgressEvent, ValidationSettings};

/// What a scripted URL does when loaded
#[derive(Debug, Clone)]
pub enum ScriptedPage {
    /// 200 with this HTML after `latency`
    Html { html: String, latency: Duration },
    /// Document response with an error status
    Status(u16),
    /// Connection never succeeds
    Unreachable,
    /// 503 for the first `failures` attempts, then the HTML
    Flaky { failures: usize, html: String },
}

#[derive(Debug, Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

#[derive(Debug, Default)]
pub struct ScriptedFactory {
    pages: Arc<HashMap<String, ScriptedPage>>,
    attempts: Arc<Mutex<HashMap<String, usize>>>,
    pub counters: Arc<Counters>,
    preflight_error: Option<String>,
    /// Number of opens after which the engine disappears
    engine_lost_after: Option<usize>,
    /// Opens that fail with a launch error before sessions start working
    failing_opens: AtomicUsize,
}

impl ScriptedFactory {
    pub fn new(pages: impl IntoIterator<Item = (String, ScriptedPage)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn without_engine(message: &str) -> Self {
        Self {
            preflight_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn losing_engine_after(mut self, opens: usize) -> Self {
        self.engine_lost_after = Some(opens);
        self
    }

    pub fn failing_first_opens(self, count: usize) -> Self {
        self.failing_opens.store(count, Ordering::SeqCst);
        self
    }

    pub fn attempts(&self, url: &str) -> usize {
        self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSession;

    async fn preflight(&self) -> Result<(), SessionError> {
        match &self.preflight_error {
            Some(message) => Err(SessionError::EngineUnavailable(message.clone())),
            None => Ok(()),
        }
    }

    async fn open(&self, _settings: &ValidationSettings) -> Result<ScriptedSession, SessionError> {
        let opened = self.counters.opened.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.engine_lost_after
            && opened > limit
        {
            self.counters.opened.fetch_sub(1, Ordering::SeqCst);
            return Err(SessionError::EngineUnavailable("browser binary vanished".to_string()));
        }
        if self
            .failing_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            self.counters.opened.fetch_sub(1, Ordering::SeqCst);
            return Err(SessionError::Launch("chrome exited during startup".to_string()));
        }

        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(ScriptedSession {
            pages: Arc::clone(&self.pages),
            attempts: Arc::clone(&self.attempts),
            counters: Arc::clone(&self.counters),
            current: None,
            closed: false,
        })
    }
}

pub struct ScriptedSession {
    pages: Arc<HashMap<String, ScriptedPage>>,
    attempts: Arc<Mutex<HashMap<String, usize>>>,
    counters: Arc<Counters>,
    current: Option<String>,
    closed: bool,
}

impl RenderSession for ScriptedSession {
    async fn load(&mut self, url: &str, _nav_timeout: Duration) -> Result<PageLoad, NavigationError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let transport = || NavigationError::Transport {
            url: url.to_string(),
            message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        };

        let page = self.pages.get(url).cloned();
        let html = match page {
            Some(ScriptedPage::Html { html, latency }) => {
                tokio::time::sleep(latency).await;
                html
            }
            Some(ScriptedPage::Status(status)) => {
                return Err(NavigationError::HttpStatus {
                    url: url.to_string(),
                    status,
                });
            }
            Some(ScriptedPage::Flaky { failures, html }) => {
                if attempt <= failures {
                    return Err(NavigationError::HttpStatus {
                        url: url.to_string(),
                        status: 503,
                    });
                }
                html
            }
            Some(ScriptedPage::Unreachable) | None => return Err(transport()),
        };

        self.current = Some(html);
        Ok(PageLoad {
            status: Some(200),
            final_url: Some(url.to_string()),
        })
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        self.current
            .clone()
            .ok_or_else(|| SessionError::Content("nothing loaded".to_string()))
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            self.counters.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Settings that keep tests fast: no inter-batch delay, no retries
pub fn fast_settings(concurrency: usize) -> ValidationSettings {
    ValidationSettings::builder()
        .concurrency_limit(concurrency)
        .delay_range(0.0, 0.0)
        .max_retries(0)
        .build()
        .unwrap()
}

/// Collects progress events in delivery order
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl Recorder {
    pub fn reporter(&self) -> impl Fn(&ProgressEvent) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event: &ProgressEvent| events.lock().unwrap().push(event.clone())
    }

    pub fn urls(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.url.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

pub fn html_page(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Test Product</title>
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

pub fn json_ld(json: &str) -> String {
    format!(r#"<script type="application/ld+json">{json}</script>"#)
}

pub const WIDGET_JSON: &str = r#"{"@type":"Product","name":"Widget","image":"http://x/i.jpg","offers":{"@type":"Offer","price":"19.99","priceCurrency":"USD","availability":"InStock"}}"#;

pub const COMPLETE_JSON: &str = r#"{
    "@context": "https://schema.org",
    "@type": "Product",
    "name": "Trail Runner 3",
    "image": ["https://shop.example/img/tr3-front.jpg", "https://shop.example/img/tr3-side.jpg"],
    "description": "Lightweight trail running shoe.",
    "brand": {"@type": "Brand", "name": "Summit"},
    "sku": "TR3-42",
    "gtin": "0123456789012",
    "aggregateRating": {"@type": "AggregateRating", "ratingValue": "4.6", "reviewCount": 128},
    "review": [{"@type": "Review", "reviewRating": {"@type": "Rating", "ratingValue": 5}, "author": "Ana"}],
    "offers": {"@type": "Offer", "price": "129.00", "priceCurrency": "EUR", "availability": "InStock"}
}"#;

/// A page carrying the Widget product as JSON-LD
pub fn widget_page() -> String {
    html_page(&json_ld(WIDGET_JSON), "<h1>Widget</h1>")
}

pub fn complete_page() -> String {
    html_page(&json_ld(COMPLETE_JSON), "<h1>Trail Runner 3</h1>")
}

pub fn html(html: String) -> ScriptedPage {
    ScriptedPage::Html {
        html,
        latency: Duration::ZERO,
    }
}

pub fn slow(html: String, millis: u64) -> ScriptedPage {
    ScriptedPage::Html {
        html,
        latency: Duration::from_millis(millis),
    }
}
