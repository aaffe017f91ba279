/// Check if a URL is an absolute http(s) URL the session layer can load
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

/// Keep the loadable URLs of an input list, trimmed, in their original order
///
/// Callers run this before handing URLs to the run engine; rejected entries
/// are logged so a dashboard import can surface them.
pub fn filter_valid_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .filter_map(|raw| {
            let candidate = raw.as_ref().trim();
            if is_valid_url(candidate) {
                Some(candidate.to_string())
            } else {
                if !candidate.is_empty() {
                    log::warn!("Skipping invalid URL: {candidate}");
                }
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_url("https://shop.example.com/p/1"));
        assert!(is_valid_url("http://shop.example.com"));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("mailto:sales@example.com"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn filter_keeps_order_and_trims() {
        let urls = filter_valid_urls([
            " https://a.example/1 ",
            "bogus",
            "",
            "https://b.example/2",
        ]);
        assert_eq!(urls, vec!["https://a.example/1", "https://b.example/2"]);
    }
}
