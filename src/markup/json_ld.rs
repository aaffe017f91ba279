//! JSON-LD `<script>` block reader

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use super::ExtractionError;
use super::candidate::ProductCandidate;
use crate::product_schema::{PRODUCT_TYPE, TYPE_KEY};

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type]").expect("BUG: hardcoded CSS selector 'script[type]' is invalid")
});

const LD_JSON_MIME: &str = "application/ld+json";

/// Legacy wrappers around script bodies, outermost first
const SCRIPT_WRAPPERS: &[(&str, &str)] = &[
    ("<!--", "-->"),
    ("/*<![CDATA[*/", "/*]]>*/"),
    ("//<![CDATA[", "//]]>"),
    ("<![CDATA[", "]]>"),
];

/// All products found in the document's JSON-LD blocks, in document order
///
/// Blocks that fail to parse are skipped; their siblings are still read.
pub(crate) fn products(document: &Html) -> Vec<ProductCandidate> {
    let mut found = Vec::new();

    for (index, source) in ld_json_blocks(document).enumerate() {
        match parse_block(index, &source) {
            Ok(value) => collect_products(value, &mut found),
            Err(e) => log::debug!("Skipping JSON-LD block: {e}"),
        }
    }

    found
}

fn ld_json_blocks(document: &Html) -> impl Iterator<Item = String> + '_ {
    document
        .select(&SCRIPT_SELECTOR)
        .filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with(LD_JSON_MIME))
        })
        .map(|script| script.text().collect::<String>())
}

fn parse_block(index: usize, source: &str) -> Result<Value, ExtractionError> {
    let trimmed = strip_wrappers(source);
    if trimmed.is_empty() {
        return Err(ExtractionError::EmptyBlock { index });
    }
    serde_json::from_str(trimmed).map_err(|source| ExtractionError::InvalidJson { index, source })
}

/// Peel HTML comment and CDATA wrappers, in any nesting
fn strip_wrappers(source: &str) -> &str {
    let mut body = source.trim();
    while let Some(inner) = SCRIPT_WRAPPERS
        .iter()
        .find_map(|&(open, close)| body.strip_prefix(open)?.strip_suffix(close))
    {
        body = inner.trim();
    }
    body
}

/// Walk a parsed block: a product object, an array of nodes, or a `@graph` container
fn collect_products(value: Value, found: &mut Vec<ProductCandidate>) {
    match value {
        Value::Object(mut map) => {
            if map.get(TYPE_KEY).is_some_and(type_is_product) {
                found.push(ProductCandidate::from_map(map));
            } else if let Some(graph) = map.remove("@graph") {
                collect_products(graph, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_products(item, found);
            }
        }
        _ => {}
    }
}

/// `@type` is either a single type or a list of types
pub(crate) fn type_is_product(t: &Value) -> bool {
    match t {
        Value::String(s) => s == PRODUCT_TYPE,
        Value::Array(types) => types.iter().any(|v| v.as_str() == Some(PRODUCT_TYPE)),
        _ => false,
    }
}
