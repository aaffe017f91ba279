//! Per-session identity: user agent and request headers

use rand::Rng;

use crate::config::UserAgentMode;
use crate::utils::{STEALTH_HEADERS, USER_AGENT_POOL};

/// Pick the user agent for a new session
#[must_use]
pub fn choose_user_agent(mode: &UserAgentMode) -> String {
    match mode {
        UserAgentMode::Custom(ua) => ua.clone(),
        UserAgentMode::Fixed => USER_AGENT_POOL[0].to_string(),
        UserAgentMode::Random => {
            let index = rand::rng().random_range(0..USER_AGENT_POOL.len());
            USER_AGENT_POOL[index].to_string()
        }
    }
}

/// Extra HTTP headers as the JSON object CDP expects
///
/// Client-hint headers only make sense for Chromium user agents and are
/// left out for Safari and Firefox identities.
#[must_use]
pub fn stealth_headers(user_agent: &str) -> serde_json::Value {
    let is_chromium = user_agent.contains("Chrome/");
    let headers: serde_json::Map<String, serde_json::Value> = STEALTH_HEADERS
        .iter()
        .filter(|(name, _)| is_chromium || !name.starts_with("Sec-Ch-Ua"))
        .map(|(name, value)| ((*name).to_string(), serde_json::Value::from(*value)))
        .collect();
    serde_json::Value::Object(headers)
}
