//! Shared tree walk for attribute-based markup (microdata and RDFa)
//!
//! Both dialects mark an item root, tag descendant properties with a name
//! attribute, and nest items by opening a new scope. They differ only in the
//! attribute names and in how property values are read.

use scraper::ElementRef;
use serde_json::{Map, Value};
use url::Url;

use crate::product_schema::{PRODUCT_TYPE, TYPE_KEY};

const SCHEMA_ORG_HOSTS: &[&str] = &["http://schema.org/", "https://schema.org/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Microdata,
    Rdfa,
}

impl Dialect {
    /// True when the element opens a new item scope
    pub(crate) fn opens_scope(self, el: &ElementRef<'_>) -> bool {
        match self {
            Self::Microdata => el.value().attr("itemscope").is_some(),
            Self::Rdfa => el.value().attr("typeof").is_some(),
        }
    }

    fn type_attr(self) -> &'static str {
        match self {
            Self::Microdata => "itemtype",
            Self::Rdfa => "typeof",
        }
    }

    fn property_attr(self) -> &'static str {
        match self {
            Self::Microdata => "itemprop",
            Self::Rdfa => "property",
        }
    }

    /// Short schema.org type names declared by the element
    pub(crate) fn item_types(self, el: &ElementRef<'_>) -> Vec<String> {
        el.value()
            .attr(self.type_attr())
            .map(|types| types.split_whitespace().filter_map(short_type_name).collect())
            .unwrap_or_default()
    }

    pub(crate) fn is_product(self, el: &ElementRef<'_>) -> bool {
        self.opens_scope(el) && self.item_types(el).iter().any(|t| t == PRODUCT_TYPE)
    }

    fn property_names(self, el: &ElementRef<'_>) -> Vec<String> {
        el.value()
            .attr(self.property_attr())
            .map(|names| {
                names
                    .split_whitespace()
                    .map(strip_vocabulary_prefix)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attribute carrying a non-scope property's value, and whether it holds a URL
    fn value_attr<'a>(self, el: &'a ElementRef<'_>) -> Option<(&'a str, bool)> {
        let attrs = el.value();
        if let Some(content) = attrs.attr("content") {
            return Some((content, false));
        }
        match self {
            Self::Rdfa => attrs
                .attr("resource")
                .or_else(|| attrs.attr("href"))
                .or_else(|| attrs.attr("src"))
                .map(|link| (link, true)),
            Self::Microdata => match attrs.name() {
                "a" | "area" | "link" => attrs.attr("href").map(|link| (link, true)),
                "img" | "audio" | "video" | "source" | "track" | "embed" | "iframe" => {
                    attrs.attr("src").map(|link| (link, true))
                }
                "object" => attrs.attr("data").map(|link| (link, true)),
                "data" | "meter" => attrs.attr("value").map(|v| (v, false)),
                "time" => attrs.attr("datetime").map(|v| (v, false)),
                _ => None,
            },
        }
    }

    /// Value of a non-scope property element
    ///
    /// URL-valued attributes are resolved against `base` when there is one.
    fn property_value(self, el: &ElementRef<'_>, base: Option<&Url>) -> Option<String> {
        let value = match self.value_attr(el) {
            Some((raw, true)) => resolve(raw.trim(), base),
            Some((raw, false)) => raw.trim().to_string(),
            None => collapse_whitespace(el),
        };

        (!value.is_empty()).then_some(value)
    }

    /// Read an item scope into a JSON object
    ///
    /// Nested scopes become nested objects and their properties are not
    /// attributed to the outer item. Repeated property names collect into an
    /// array in document order.
    pub(crate) fn read_item(self, root: &ElementRef<'_>, base: Option<&Url>) -> Map<String, Value> {
        let mut item = Map::new();
        if let Some(item_type) = self.item_types(root).into_iter().next() {
            item.insert(TYPE_KEY.to_string(), Value::String(item_type));
        }
        self.read_children(root, base, &mut item);
        item
    }

    fn read_children(
        self,
        parent: &ElementRef<'_>,
        base: Option<&Url>,
        item: &mut Map<String, Value>,
    ) {
        for child in parent.children().filter_map(ElementRef::wrap) {
            let names = self.property_names(&child);
            let nested = self.opens_scope(&child);

            if !names.is_empty() {
                let value = if nested {
                    let object = self.read_item(&child, base);
                    (!object.is_empty()).then_some(Value::Object(object))
                } else {
                    self.property_value(&child, base).map(Value::String)
                };

                if let Some(value) = value {
                    for name in names {
                        push_property(item, name, value.clone());
                    }
                }
            }

            // A nested scope owns everything below it
            if !nested {
                self.read_children(&child, base, item);
            }
        }
    }
}

fn push_property(item: &mut Map<String, Value>, name: String, value: Value) {
    match item.get_mut(&name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            item.insert(name, value);
        }
    }
}

/// Absolute form of a link; unresolvable links are kept as written
fn resolve(link: &str, base: Option<&Url>) -> String {
    match base.map(|base| base.join(link)) {
        Some(Ok(absolute)) => absolute.to_string(),
        _ => link.to_string(),
    }
}

fn collapse_whitespace(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `schema:name`, `https://schema.org/name` and `name` all become `name`
pub(crate) fn strip_vocabulary_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix("schema:") {
        return rest;
    }
    SCHEMA_ORG_HOSTS
        .iter()
        .find_map(|host| name.strip_prefix(host))
        .unwrap_or(name)
}

/// Short type name for a schema.org type reference, `None` for other vocabularies
fn short_type_name(token: &str) -> Option<String> {
    let stripped = strip_vocabulary_prefix(token).trim_end_matches('/');
    if stripped.contains(':') || stripped.contains('/') || stripped.is_empty() {
        return None;
    }
    Some(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_prefixes_are_stripped() {
        assert_eq!(strip_vocabulary_prefix("schema:price"), "price");
        assert_eq!(strip_vocabulary_prefix("https://schema.org/price"), "price");
        assert_eq!(strip_vocabulary_prefix("http://schema.org/price"), "price");
        assert_eq!(strip_vocabulary_prefix("price"), "price");
    }

    #[test]
    fn type_names_outside_schema_org_are_ignored() {
        assert_eq!(short_type_name("https://schema.org/Product"), Some("Product".to_string()));
        assert_eq!(short_type_name("http://schema.org/Product/"), Some("Product".to_string()));
        assert_eq!(short_type_name("schema:Offer"), Some("Offer".to_string()));
        assert_eq!(short_type_name("http://data-vocabulary.org/Product"), None);
        assert_eq!(short_type_name("og:product"), None);
    }

    #[test]
    fn links_resolve_against_base() {
        let base = Url::parse("https://shop.example/catalog/shoes/trail").unwrap();
        assert_eq!(resolve("/shoe.jpg", Some(&base)), "https://shop.example/shoe.jpg");
        assert_eq!(
            resolve("img/side.jpg", Some(&base)),
            "https://shop.example/catalog/shoes/img/side.jpg"
        );
        assert_eq!(resolve("//cdn.example/a.png", Some(&base)), "https://cdn.example/a.png");
        assert_eq!(resolve("https://cdn.example/b.png", Some(&base)), "https://cdn.example/b.png");
        assert_eq!(resolve("/shoe.jpg", None), "/shoe.jpg");
    }
}
