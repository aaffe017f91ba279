//! Recognise bot-challenge interstitials

use std::sync::LazyLock;

use regex::Regex;

/// Markers left in the DOM by common anti-bot interstitials
const CHALLENGE_MARKERS: &[&str] = &[
    "<title>Just a moment...</title>",
    "Attention Required! | Cloudflare",
    "cf-browser-verification",
    "challenge-platform",
    "cf-chl-",
];

static CAPTCHA_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(form|div|iframe)[^>]+(id|class|src)="[^"]*(captcha|hcaptcha|recaptcha)"#)
        .expect("CAPTCHA_FORM_RE: hardcoded regex is valid")
});

/// HTTP statuses servers use to turn automated clients away
#[must_use]
pub fn is_blocking_status(status: u16) -> bool {
    matches!(status, 403 | 429)
}

/// Whether rendered content is a challenge page rather than the product page
#[must_use]
pub fn looks_like_challenge(html: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| html.contains(marker)) || CAPTCHA_FORM_RE.is_match(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cloudflare_interstitial() {
        let html = r#"<html><head><title>Just a moment...</title></head>
            <body><div id="challenge-platform"></div></body></html>"#;
        assert!(looks_like_challenge(html));
    }

    #[test]
    fn detects_captcha_form() {
        let html = r#"<form id="captcha-form" action="/verify"><input name="answer"></form>"#;
        assert!(looks_like_challenge(html));
        let iframe = r#"<iframe src="https://www.google.com/recaptcha/api2/anchor"></iframe>"#;
        assert!(looks_like_challenge(iframe));
    }

    #[test]
    fn ordinary_pages_pass() {
        let html = r#"<html><head><title>Blue Widget | Shop</title></head>
            <body><h1>Blue Widget</h1><p>Just a moment of your time.</p></body></html>"#;
        assert!(!looks_like_challenge(html));
    }

    #[test]
    fn blocking_statuses() {
        assert!(is_blocking_status(403));
        assert!(is_blocking_status(429));
        assert!(!is_blocking_status(404));
        assert!(!is_blocking_status(503));
    }
}
