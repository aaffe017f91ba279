pub mod browser_setup;
pub mod config;
pub mod kromekover;
pub mod markup;
pub mod product_schema;
pub mod run_engine;
pub mod session;
pub mod utils;
pub mod validation;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{StatusPolicy, UserAgentMode, ValidationSettings};
pub use markup::{Extraction, MarkupFormat, ProductCandidate, extract, extract_detailed};
pub use run_engine::{
    ChannelProgress, NoOpProgress, ProgressEvent, ProgressReporter, ResultStatus, RunController,
    RunError, RunHandle, RunManager, RunOutcome, RunReport, RunStateSnapshot, RunSummary,
    ValidationResult,
};
pub use session::{ChromiumSessionFactory, NavigationError, RenderSession, SessionError, SessionFactory};
pub use utils::filter_valid_urls;
pub use validation::{Issue, ValidationVerdict, validate};

/// Validate `urls` with local Chromium sessions and no progress reporting
pub async fn validate_urls(
    urls: Vec<String>,
    settings: ValidationSettings,
) -> Result<RunReport, RunError> {
    let controller = RunController::new(ChromiumSessionFactory::new());
    controller
        .run(urls, settings, &RunHandle::new(), &NoOpProgress)
        .await
}
