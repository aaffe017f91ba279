//! Abort cosmetic requests through the CDP Fetch domain
//!
//! Only the blocked resource classes are intercepted, so documents and
//! scripts never pause: script-injected JSON-LD still renders.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::fetch::{
    EnableParams, EventRequestPaused, FailRequestParams, RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Resource classes aborted when blocking is enabled
pub const BLOCKED_RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::Image,
    ResourceType::Media,
    ResourceType::Font,
    ResourceType::Stylesheet,
];

fn patterns() -> Vec<RequestPattern> {
    BLOCKED_RESOURCE_TYPES
        .iter()
        .map(|resource_type| RequestPattern {
            url_pattern: Some("*".to_string()),
            resource_type: Some(resource_type.clone()),
            request_stage: Some(RequestStage::Request),
        })
        .collect()
}

/// Start intercepting; the returned task answers paused requests until aborted
pub async fn enable(page: &Page) -> Result<JoinHandle<()>> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .context("Failed to subscribe to Fetch.requestPaused")?;

    page.execute(EnableParams {
        patterns: Some(patterns()),
        handle_auth_requests: None,
    })
    .await
    .context("Failed to enable request interception")?;

    let page = page.clone();
    let task = tokio::spawn(async move {
        let mut blocked = 0usize;
        while let Some(event) = paused.next().await {
            let request_id = event.request_id.clone();
            if let Err(e) = page
                .execute(FailRequestParams::new(request_id, ErrorReason::BlockedByClient))
                .await
            {
                trace!("Could not abort {}: {}", event.request.url, e);
            } else {
                blocked += 1;
            }
        }
        debug!("Resource blocker finished after aborting {blocked} requests");
    });

    Ok(task)
}
