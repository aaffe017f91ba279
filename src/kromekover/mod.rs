use anyhow::Result;
use chromiumoxide::{Page, cdp};
use futures::future::join_all;
use tracing::{debug, warn};

mod config;
pub mod countermeasures;

pub use config::StealthProfile;
pub use countermeasures::{Countermeasure, StealthLevel, TABLE_VERSION};

/// Install the level's countermeasures on a fresh page, then override the user agent
///
/// Must run before the first navigation. Injection is best effort: individual
/// failures are logged and only a page with zero installed scripts is an
/// error. Returns the number of installed countermeasures.
pub async fn inject(page: &Page, profile: &StealthProfile, level: StealthLevel) -> Result<usize> {
    let table = level.countermeasures();
    debug!(
        "Injecting {} stealth countermeasures (table v{})",
        table.len(),
        TABLE_VERSION
    );

    let inject_futures: Vec<_> = table
        .iter()
        .map(|countermeasure| {
            let page = page.clone();
            let source = countermeasure.render(profile);
            async move {
                let result = page
                    .execute(
                        cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams {
                            source,
                            include_command_line_api: None,
                            world_name: None,
                            run_immediately: None,
                        },
                    )
                    .await;
                (countermeasure.name(), result)
            }
        })
        .collect();

    let mut success_count = 0;
    let mut failed = Vec::new();

    for (name, result) in join_all(inject_futures).await {
        match result {
            Ok(_) => {
                debug!("✓ Injected: {}", name);
                success_count += 1;
            }
            Err(e) => {
                warn!("✗ Failed to inject {}: {}", name, e);
                failed.push(name);
            }
        }
    }

    if success_count == 0 {
        return Err(anyhow::anyhow!(
            "Failed to inject any stealth countermeasures ({} failures)",
            failed.len()
        ));
    }
    if !failed.is_empty() {
        warn!("{} countermeasures not installed: {:?}", failed.len(), failed);
    }

    // Modify user agent last
    let modified_ua = profile.user_agent.replace("Headless", "");
    page.execute(cdp::browser_protocol::network::SetUserAgentOverrideParams {
        user_agent: modified_ua,
        accept_language: Some(profile.accept_language.clone()),
        platform: Some(profile.platform.clone()),
        user_agent_metadata: None,
    })
    .await?;

    debug!(
        "Stealth injection complete: {}/{} countermeasures active",
        success_count,
        table.len()
    );
    Ok(success_count)
}
