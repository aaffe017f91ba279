//! schema.org `Product` definition
//!
//! Three artifacts: the structural schema walked by the validator, the
//! ordered required field list, and the ordered recommended field list.
//! Field names use schema.org spelling, so they line up with what the markup
//! extractor produces.

pub mod node;

use std::sync::LazyLock;

use regex::Regex;

pub use node::SchemaNode;

/// Bumped whenever a constraint below changes meaning
pub const SCHEMA_VERSION: &str = "2024.1";

/// Type discriminator every candidate must carry
pub const PRODUCT_TYPE: &str = "Product";

/// Key of the type discriminator in a candidate
pub const TYPE_KEY: &str = "@type";

/// Fields a product must carry; each missing one is an error
pub const REQUIRED_FIELDS: &[&str] = &["name", "image", "offers"];

/// Fields a product should carry; each missing one is a warning
pub const RECOMMENDED_FIELDS: &[&str] = &[
    "description",
    "brand",
    "sku",
    "gtin",
    "aggregateRating",
    "review",
];

/// Sub-fields an `offers` object must carry
pub const REQUIRED_OFFER_FIELDS: &[&str] = &["price", "priceCurrency", "availability"];

/// Accepted `offers.availability` values
pub const AVAILABILITY_VALUES: &[&str] = &["InStock", "OutOfStock", "PreOrder", "LimitedAvailability"];

/// Unsigned decimal with zero or two fractional digits
pub const PRICE_PATTERN: &str = r"^\d+(\.\d{2})?$";

/// ISO 4217 style currency code
pub const CURRENCY_PATTERN: &str = r"^[A-Z]{3}$";

static PRODUCT_SCHEMA: LazyLock<SchemaNode> = LazyLock::new(build_product_schema);

/// Structural schema for a `Product` candidate
#[must_use]
pub fn product_schema() -> &'static SchemaNode {
    &PRODUCT_SCHEMA
}

/// The structural schema as a JSON Schema document
#[must_use]
pub fn to_json_schema() -> serde_json::Value {
    let mut schema = PRODUCT_SCHEMA.to_json_schema();
    schema["$schema"] = serde_json::json!("https://json-schema.org/draft/2020-12/schema");
    schema["title"] = serde_json::json!(format!("schema.org Product ({SCHEMA_VERSION})"));
    schema
}

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRICE_PATTERN).expect("PRICE_PATTERN: hardcoded regex is valid"));

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CURRENCY_PATTERN).expect("CURRENCY_PATTERN: hardcoded regex is valid")
});

fn rating_value() -> SchemaNode {
    SchemaNode::Number {
        min: Some(1.0),
        max: Some(5.0),
    }
}

fn build_product_schema() -> SchemaNode {
    let offer = SchemaNode::Object {
        properties: vec![
            ("price", SchemaNode::Pattern(PRICE_RE.clone())),
            ("priceCurrency", SchemaNode::Pattern(CURRENCY_RE.clone())),
            ("availability", SchemaNode::Enum(AVAILABILITY_VALUES)),
        ],
        required: REQUIRED_OFFER_FIELDS,
    };

    let aggregate_rating = SchemaNode::Object {
        properties: vec![
            ("ratingValue", rating_value()),
            ("reviewCount", SchemaNode::Integer { min: Some(0) }),
        ],
        required: &[],
    };

    let review = SchemaNode::Object {
        properties: vec![(
            "reviewRating",
            SchemaNode::Object {
                properties: vec![("ratingValue", rating_value())],
                required: &[],
            },
        )],
        required: &[],
    };

    SchemaNode::Object {
        properties: vec![
            (TYPE_KEY, SchemaNode::TypeTag(PRODUCT_TYPE)),
            ("name", SchemaNode::NonEmptyString),
            (
                "image",
                SchemaNode::AnyOf(vec![
                    SchemaNode::Uri,
                    SchemaNode::ArrayOf(Box::new(SchemaNode::Uri)),
                ]),
            ),
            ("offers", offer),
            ("description", SchemaNode::String),
            (
                "brand",
                SchemaNode::AnyOf(vec![
                    SchemaNode::NonEmptyString,
                    SchemaNode::Object {
                        properties: vec![("name", SchemaNode::String)],
                        required: &[],
                    },
                ]),
            ),
            ("aggregateRating", aggregate_rating),
            ("review", SchemaNode::ArrayOf(Box::new(review))),
        ],
        required: &[TYPE_KEY, "name", "image", "offers"],
    }
}
