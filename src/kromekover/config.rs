use crate::utils::{ACCEPT_LANGUAGE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Fingerprint values a session presents to the page
///
/// Derived from the session's user agent so the platform, languages and
/// header values agree with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealthProfile {
    pub user_agent: String,
    pub accept_language: String,
    pub platform: String,
    pub languages: Vec<String>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub hardware_concurrency: u32,
}

impl StealthProfile {
    #[must_use]
    pub fn for_user_agent(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        let (platform, webgl_vendor, webgl_renderer) = if user_agent.contains("Macintosh") {
            ("MacIntel", "Apple Inc.", "Apple M1")
        } else if user_agent.contains("Linux") {
            ("Linux x86_64", "Intel", "Mesa Intel(R) UHD Graphics 620 (KBL GT2)")
        } else {
            ("Win32", "Intel Inc.", "Intel(R) UHD Graphics")
        };

        Self {
            user_agent,
            accept_language: ACCEPT_LANGUAGE.to_string(),
            platform: platform.to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            screen_width: VIEWPORT_WIDTH,
            screen_height: VIEWPORT_HEIGHT,
            webgl_vendor: webgl_vendor.to_string(),
            webgl_renderer: webgl_renderer.to_string(),
            hardware_concurrency: 8,
        }
    }
}
