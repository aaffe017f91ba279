//! RDFa (`typeof` / `property`) reader

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::candidate::ProductCandidate;
use super::item_scope::Dialect;
use crate::product_schema::{PRODUCT_TYPE, TYPE_KEY};

static TYPEOF_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[typeof]").expect("BUG: hardcoded CSS selector '[typeof]' is invalid")
});

/// Products declared with RDFa, in document order
pub(crate) fn products(document: &Html, base: Option<&Url>) -> Vec<ProductCandidate> {
    document
        .select(&TYPEOF_SELECTOR)
        .filter(|el| Dialect::Rdfa.is_product(el))
        .map(|el| {
            let mut fields = Dialect::Rdfa.read_item(&el, base);
            fields.insert(TYPE_KEY.to_string(), PRODUCT_TYPE.into());
            ProductCandidate::from_map(fields)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_prefixes_from_property_names() {
        let doc = Html::parse_document(
            r#"<div vocab="https://schema.org/" typeof="schema:Product">
                 <span property="schema:name">Desk</span>
                 <img property="https://schema.org/image" src="https://x.example/desk.png">
                 <div property="offers" typeof="Offer">
                   <span property="price" content="120.00">120 EUR</span>
                   <span property="priceCurrency">EUR</span>
                 </div>
               </div>"#,
        );
        let found = products(&doc, None);
        assert_eq!(found.len(), 1);
        let p = &found[0];
        assert_eq!(p.get("@type"), Some(&json!("Product")));
        assert_eq!(p.get("name"), Some(&json!("Desk")));
        assert_eq!(p.get("image"), Some(&json!("https://x.example/desk.png")));
        assert_eq!(
            p.get("offers"),
            Some(&json!({"@type": "Offer", "price": "120.00", "priceCurrency": "EUR"}))
        );
    }

    #[test]
    fn full_iri_type_is_recognized() {
        let doc = Html::parse_document(
            r#"<div typeof="http://schema.org/Product"><span property="name">Mug</span></div>"#,
        );
        assert_eq!(products(&doc, None).len(), 1);
    }
}
