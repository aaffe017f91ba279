//! Live browser checks; need a local Chrome/Chromium (or CHROMIUM_PATH)

use std::time::Duration;

use anyhow::Result;
use product_schema_validator::browser_setup::{
    LaunchOptions, launch_browser, resolve_browser_executable,
};
use product_schema_validator::kromekover::{StealthLevel, StealthProfile, inject};
use product_schema_validator::session::identity::choose_user_agent;
use product_schema_validator::session::{
    ChromiumSessionFactory, RenderSession, SessionFactory,
};
use product_schema_validator::{UserAgentMode, ValidationSettings, extract};
use tempfile::TempDir;

mod common;

#[tokio::test]
#[ignore = "requires a local Chrome/Chromium"]
async fn test_evasions() -> Result<()> {
    let profile_dir = TempDir::new()?;
    let user_agent = choose_user_agent(&UserAgentMode::Fixed);
    let options = LaunchOptions {
        headless: true,
        user_agent: user_agent.clone(),
        user_data_dir: profile_dir.path().to_path_buf(),
        request_timeout: Duration::from_secs(30),
    };

    let executable = resolve_browser_executable().await?;
    let (mut browser, handler) = launch_browser(&executable, &options).await?;
    let page = browser.new_page("about:blank").await?;

    let profile = StealthProfile::for_user_agent(&user_agent);
    let installed = inject(&page, &profile, StealthLevel::Full).await?;
    assert_eq!(installed, StealthLevel::Full.countermeasures().len());

    page.goto("data:text/html,<html><body></body></html>").await?;

    let webdriver = page.evaluate("navigator.webdriver").await?;
    assert_ne!(webdriver.value().and_then(|v| v.as_bool()), Some(true));

    let languages: Vec<String> = page.evaluate("navigator.languages").await?.into_value()?;
    assert!(languages.iter().any(|l| l == "en-US"));

    let platform: String = page.evaluate("navigator.platform").await?.into_value()?;
    assert_eq!(platform, profile.platform);

    let reported_ua: String = page.evaluate("navigator.userAgent").await?.into_value()?;
    assert_eq!(reported_ua, user_agent);

    browser.close().await?;
    browser.wait().await?;
    handler.abort();
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chrome/Chromium"]
async fn session_renders_and_extracts_a_product() -> Result<()> {
    let factory = ChromiumSessionFactory::new();
    factory.preflight().await?;

    let settings = ValidationSettings::builder()
        .settle_delay_ms(0)
        .build()?;
    let mut session = factory.open(&settings).await?;

    let page = common::widget_page();
    let url = format!("data:text/html,{}", percent_encode(&page));
    let load = session.load(&url, settings.nav_timeout()).await;
    let content = session.content().await;
    session.close().await;

    load?;
    let candidate = extract(&content?).expect("product rendered");
    assert_eq!(candidate.get("name"), Some(&serde_json::json!("Widget")));
    Ok(())
}

fn percent_encode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
