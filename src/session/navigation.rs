use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::{NavigationError, PageLoad, RenderSession};
use crate::config::ValidationSettings;
use crate::utils::{RETRY_BACKOFF_MAX_MS, RETRY_BACKOFF_MIN_MS};

/// Random pause between navigation attempts
#[must_use]
pub fn retry_backoff() -> Duration {
    let millis = rand::rng().random_range(RETRY_BACKOFF_MIN_MS..=RETRY_BACKOFF_MAX_MS);
    Duration::from_millis(millis)
}

/// Navigate with up to `max_retries` extra attempts on transient failures
///
/// Client errors other than 429 are returned immediately.
pub async fn navigate_with_retry<S: RenderSession>(
    session: &mut S,
    url: &str,
    settings: &ValidationSettings,
) -> Result<PageLoad, NavigationError> {
    navigate_with_backoff(session, url, settings, retry_backoff).await
}

pub(crate) async fn navigate_with_backoff<S, B>(
    session: &mut S,
    url: &str,
    settings: &ValidationSettings,
    backoff: B,
) -> Result<PageLoad, NavigationError>
where
    S: RenderSession,
    B: Fn() -> Duration,
{
    let max_attempts = settings.max_attempts();
    let mut attempt = 1;

    loop {
        match session.load(url, settings.nav_timeout()).await {
            Ok(load) => {
                if attempt > 1 {
                    debug!("Loaded {url} on attempt {attempt}/{max_attempts}");
                }
                return Ok(load);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let pause = backoff();
                warn!(
                    "Attempt {attempt}/{max_attempts} for {url} failed: {e}; retrying in {}ms",
                    pause.as_millis()
                );
                tokio::time::sleep(pause).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;
    use std::collections::VecDeque;

    struct Scripted {
        outcomes: VecDeque<Result<PageLoad, NavigationError>>,
        calls: usize,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<PageLoad, NavigationError>>) -> Self {
            Self {
                outcomes: outcomes.into(),
                calls: 0,
            }
        }
    }

    impl RenderSession for Scripted {
        async fn load(
            &mut self,
            _url: &str,
            _nav_timeout: Duration,
        ) -> Result<PageLoad, NavigationError> {
            self.calls += 1;
            self.outcomes
                .pop_front()
                .unwrap_or_else(|| Ok(PageLoad::default()))
        }

        async fn content(&mut self) -> Result<String, SessionError> {
            Ok(String::new())
        }

        async fn close(&mut self) {}
    }

    fn http(status: u16) -> NavigationError {
        NavigationError::HttpStatus {
            url: "https://shop.example".to_string(),
            status,
        }
    }

    fn settings(max_retries: u32) -> ValidationSettings {
        ValidationSettings::builder()
            .max_retries(max_retries)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn server_error_is_retried_once() {
        let mut session = Scripted::new(vec![
            Err(http(503)),
            Ok(PageLoad {
                status: Some(200),
                final_url: None,
            }),
        ]);
        let load = navigate_with_backoff(&mut session, "u", &settings(1), || Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(load.status, Some(200));
        assert_eq!(session.calls, 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let mut session = Scripted::new(vec![Err(http(404))]);
        let err = navigate_with_backoff(&mut session, "u", &settings(3), || Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(session.calls, 1);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let mut session = Scripted::new(vec![Err(http(500)), Err(http(502)), Err(http(503))]);
        let err = navigate_with_backoff(&mut session, "u", &settings(1), || Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(session.calls, 2);
    }

    #[test]
    fn backoff_in_range() {
        for _ in 0..20 {
            let pause = retry_backoff();
            assert!(pause >= Duration::from_millis(RETRY_BACKOFF_MIN_MS));
            assert!(pause <= Duration::from_millis(RETRY_BACKOFF_MAX_MS));
        }
    }
}
