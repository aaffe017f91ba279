//! Shared configuration constants for the validator
//!
//! Default values and tuning constants used across the session layer and the
//! run engine, kept in one place to avoid magic numbers.

/// Default navigation timeout: 30 seconds
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Default lower bound of the randomized inter-batch delay, in seconds
pub const DEFAULT_DELAY_MIN_SEC: f64 = 2.0;

/// Default upper bound of the randomized inter-batch delay, in seconds
pub const DEFAULT_DELAY_MAX_SEC: f64 = 5.0;

/// Longest accepted inter-batch delay, in seconds
pub const MAX_DELAY_SEC: f64 = 3_600.0;

/// Default number of navigation retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default number of URLs processed in parallel per batch
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 3;

/// Extra wait after DOMContentLoaded so script-injected markup can appear
///
/// Many storefronts render their JSON-LD from a client bundle that runs
/// after the document is parsed. Two seconds covers the common cases
/// without waiting for network idle.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;

/// Poll interval while a run is paused
pub const PAUSE_POLL_INTERVAL_MS: u64 = 100;

/// Poll interval while waiting for `document.readyState`
pub const READY_STATE_POLL_INTERVAL_MS: u64 = 100;

/// Bounds of the uniform backoff between navigation attempts, in milliseconds
pub const RETRY_BACKOFF_MIN_MS: u64 = 1_000;
pub const RETRY_BACKOFF_MAX_MS: u64 = 3_000;

/// Fixed desktop viewport used by every session
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Curated desktop user-agent pool
///
/// Sessions pick one uniformly at random in `random` mode; `fixed` mode
/// always uses the first entry. Keep the pool to browsers released within
/// roughly the last year so the strings stay plausible.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/121.0",
];

/// Accept-Language sent with every request and reported by the stealth layer
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Extra request headers that make the session look like a regular browser tab
pub const STEALTH_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    ("Accept-Language", ACCEPT_LANGUAGE),
    ("Cache-Control", "max-age=0"),
    (
        "Sec-Ch-Ua",
        "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
    ),
    ("Sec-Ch-Ua-Mobile", "?0"),
    ("Sec-Ch-Ua-Platform", "\"Windows\""),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("Upgrade-Insecure-Requests", "1"),
    ("DNT", "1"),
];
