//! Validate a single URL inside its own session

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::challenge;
use super::result::{ResultStatus, ValidationResult};
use crate::config::ValidationSettings;
use crate::markup;
use crate::session::{NavigationError, RenderSession, SessionError, SessionFactory, navigate_with_retry};
use crate::validation;

const CHALLENGE_MESSAGE: &str = "bot challenge page served instead of product content";

/// Terminal result for one URL, plus whether the engine itself went away
#[derive(Debug)]
pub(crate) struct ProcessedPage {
    pub result: ValidationResult,
    pub engine_unavailable: bool,
}

impl ProcessedPage {
    fn done(result: ValidationResult) -> Self {
        Self {
            result,
            engine_unavailable: false,
        }
    }
}

/// Open a fresh session, load and validate `url`, always close the session
pub(crate) async fn process_url<F: SessionFactory>(
    factory: &F,
    url: &str,
    settings: &ValidationSettings,
) -> ProcessedPage {
    let started = Instant::now();
    info!("Processing {url}");

    let mut session = match factory.open(settings).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Could not open a session for {url}: {e}");
            return ProcessedPage {
                engine_unavailable: matches!(e, SessionError::EngineUnavailable(_)),
                result: ValidationResult::failed(
                    url,
                    ResultStatus::Error,
                    e.to_string(),
                    started.elapsed(),
                ),
            };
        }
    };

    let result = inspect(&mut session, url, settings, started).await;
    session.close().await;

    info!(
        "Finished {url}: {} in {:.2}s",
        result.status,
        result.response_time.as_secs_f64()
    );
    ProcessedPage::done(result)
}

async fn inspect<S: RenderSession>(
    session: &mut S,
    url: &str,
    settings: &ValidationSettings,
    started: Instant,
) -> ValidationResult {
    let load = match navigate_with_retry(session, url, settings).await {
        Ok(load) => load,
        Err(e) => return navigation_failure(url, &e, started.elapsed()),
    };

    if let Some(final_url) = load.final_url.as_deref()
        && final_url != url
    {
        debug!("{url} redirected to {final_url}");
    }

    let html = match session.content().await {
        Ok(html) => html,
        Err(e) => {
            warn!("Could not read content of {url}: {e}");
            return ValidationResult::failed(url, ResultStatus::Error, e.to_string(), started.elapsed());
        }
    };

    let page_url = load.final_url.as_deref().unwrap_or(url);
    match markup::extract_detailed(&html, Some(page_url)) {
        Some(extraction) => {
            debug!(
                "{url}: {} product via {} ({} seen)",
                extraction.candidate.get("name").and_then(|v| v.as_str()).unwrap_or("unnamed"),
                extraction.format,
                extraction.products_seen
            );
            let verdict = validation::validate_candidate(&extraction.candidate);
            ValidationResult::validated(
                url,
                extraction,
                verdict,
                settings.status_policy(),
                started.elapsed(),
            )
        }
        None if challenge::looks_like_challenge(&html) => {
            warn!("{url} served a bot challenge");
            ValidationResult::failed(url, ResultStatus::Blocked, CHALLENGE_MESSAGE, started.elapsed())
        }
        None => ValidationResult::no_schema(url, started.elapsed()),
    }
}

fn navigation_failure(url: &str, err: &NavigationError, elapsed: Duration) -> ValidationResult {
    warn!("Navigation failed for {url}: {err}");
    let status = if err.status().is_some_and(challenge::is_blocking_status) {
        ResultStatus::Blocked
    } else {
        ResultStatus::Error
    };
    ValidationResult::failed(url, status, err.to_string(), elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_are_blocked_and_outages_are_errors() {
        let forbidden = NavigationError::HttpStatus {
            url: "https://x.example".to_string(),
            status: 403,
        };
        let result = navigation_failure("https://x.example", &forbidden, Duration::ZERO);
        assert_eq!(result.status, ResultStatus::Blocked);
        assert_eq!(result.error.as_deref(), Some("HTTP 403 for https://x.example"));

        let timeout = NavigationError::Timeout {
            url: "https://x.example".to_string(),
            after: Duration::from_secs(30),
        };
        let result = navigation_failure("https://x.example", &timeout, Duration::ZERO);
        assert_eq!(result.status, ResultStatus::Error);
        assert!(result.verdict.is_none());
    }
}
