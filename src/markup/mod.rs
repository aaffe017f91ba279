//! Structured-data extraction from rendered HTML
//!
//! Formats are tried in strict precedence: JSON-LD, then microdata, then
//! RDFa. The first format that yields a `Product` wins and formats are never
//! merged. Within the winning format only the first product is returned.

pub mod candidate;
mod item_scope;
mod json_ld;
mod microdata;
mod rdfa;

use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

pub use candidate::{Extraction, MarkupFormat, ProductCandidate};

static BASE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("base[href]").expect("BUG: hardcoded CSS selector 'base[href]' is invalid")
});

/// Problems with a single structured-data block
///
/// Always recovered locally: the block is skipped and extraction continues.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("JSON-LD block {index} is empty")]
    EmptyBlock { index: usize },

    #[error("JSON-LD block {index} is not valid JSON: {source}")]
    InvalidJson {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Extract the page's first `Product`, or `None` when there is none
///
/// Links in microdata and RDFa stay as written; use [`extract_detailed`]
/// with the page URL to resolve them.
#[must_use]
pub fn extract(html: &str) -> Option<ProductCandidate> {
    extract_detailed(html, None).map(|extraction| extraction.candidate)
}

/// Like [`extract`], also reporting the format and how many products were seen
///
/// `page_url` is the address the HTML was loaded from. With it (or with an
/// absolute `<base href>`), URL-valued microdata and RDFa attributes such as
/// `<img src="/shoe.jpg">` become absolute URLs. JSON-LD values are never
/// rewritten.
#[must_use]
pub fn extract_detailed(html: &str, page_url: Option<&str>) -> Option<Extraction> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    for format in [MarkupFormat::JsonLd, MarkupFormat::Microdata, MarkupFormat::Rdfa] {
        let mut found = match format {
            MarkupFormat::JsonLd => json_ld::products(&document),
            MarkupFormat::Microdata => microdata::products(&document, base.as_ref()),
            MarkupFormat::Rdfa => rdfa::products(&document, base.as_ref()),
        };
        if found.is_empty() {
            continue;
        }

        let products_seen = found.len();
        if products_seen > 1 {
            log::debug!("Page declares {products_seen} {format} products, using the first");
        }

        let candidate = found.swap_remove(0);
        return Some(Extraction {
            candidate,
            format,
            products_seen,
        });
    }

    None
}

/// Base URL for relative links: the page URL, overridden by `<base href>`
fn document_base(document: &Html, page_url: Option<&str>) -> Option<Url> {
    let page = page_url.and_then(|raw| match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            log::debug!("Ignoring unparseable page URL {raw}: {e}");
            None
        }
    });

    let declared = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|base| base.value().attr("href"))
        .map(str::trim);

    match (page, declared) {
        (Some(page), Some(href)) => page.join(href).ok().or(Some(page)),
        (None, Some(href)) => Url::parse(href).ok(),
        (page, None) => page,
    }
}
