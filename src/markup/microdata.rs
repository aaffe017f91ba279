//! Microdata (`itemscope` / `itemtype` / `itemprop`) reader

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::candidate::ProductCandidate;
use super::item_scope::Dialect;
use crate::product_schema::{PRODUCT_TYPE, TYPE_KEY};

static ITEMSCOPE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[itemscope][itemtype]")
        .expect("BUG: hardcoded CSS selector '[itemscope][itemtype]' is invalid")
});

/// Products declared with microdata, in document order
pub(crate) fn products(document: &Html, base: Option<&Url>) -> Vec<ProductCandidate> {
    document
        .select(&ITEMSCOPE_SELECTOR)
        .filter(|el| Dialect::Microdata.is_product(el))
        .map(|el| {
            let mut fields = Dialect::Microdata.read_item(&el, base);
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
    fn reads_properties_and_nested_offer() {
        let doc = Html::parse_document(
            r#"<div itemscope itemtype="https://schema.org/Product">
                 <h1 itemprop="name">  Trail   Shoe </h1>
                 <img itemprop="image" src="https://cdn.example/shoe.jpg">
                 <meta itemprop="sku" content="TS-1">
                 <div itemprop="offers" itemscope itemtype="https://schema.org/Offer">
                   <span itemprop="price" content="89.00">$89</span>
                   <meta itemprop="priceCurrency" content="USD">
                   <link itemprop="availability" href="https://schema.org/InStock">
                 </div>
               </div>"#,
        );
        let found = products(&doc, None);
        assert_eq!(found.len(), 1);
        let p = &found[0];
        assert_eq!(p.get("@type"), Some(&json!("Product")));
        assert_eq!(p.get("name"), Some(&json!("Trail Shoe")));
        assert_eq!(p.get("image"), Some(&json!("https://cdn.example/shoe.jpg")));
        assert_eq!(p.get("sku"), Some(&json!("TS-1")));
        assert_eq!(
            p.get("offers"),
            Some(&json!({
                "@type": "Offer",
                "price": "89.00",
                "priceCurrency": "USD",
                "availability": "https://schema.org/InStock"
            }))
        );
        // Offer properties stay inside the offer
        assert!(p.get("price").is_none());
    }

    #[test]
    fn repeated_properties_become_arrays_and_empty_values_are_skipped() {
        let doc = Html::parse_document(
            r#"<div itemscope itemtype="http://schema.org/Product">
                 <img itemprop="image" src="/a.jpg"><img itemprop="image" src="/b.jpg">
                 <span itemprop="description">   </span>
               </div>"#,
        );
        let found = products(&doc, None);
        assert_eq!(found[0].get("image"), Some(&json!(["/a.jpg", "/b.jpg"])));
        assert!(found[0].get("description").is_none());
    }

    #[test]
    fn other_item_types_are_ignored() {
        let doc = Html::parse_document(
            r#"<div itemscope itemtype="https://schema.org/Recipe"><span itemprop="name">Soup</span></div>"#,
        );
        assert!(products(&doc, None).is_empty());
    }
}
