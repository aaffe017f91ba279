//! Declarative schema nodes
//!
//! A small subset of JSON Schema, expressed as data so the structural
//! checker in `validation::structural` can walk it and so it can be exported
//! as a regular JSON Schema document.

use regex::Regex;
use serde_json::{Map, Value, json};

/// One node of a structural schema
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Object with ordered known properties; unknown properties are allowed
    Object {
        properties: Vec<(&'static str, SchemaNode)>,
        required: &'static [&'static str],
    },
    /// schema.org type discriminator: the string itself, or an array that contains it
    TypeTag(&'static str),
    /// Any string
    String,
    /// String with at least one character
    NonEmptyString,
    /// Absolute URI string
    Uri,
    /// String matching a regular expression
    Pattern(Regex),
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// Number within inclusive bounds; numeric strings are accepted
    Number { min: Option<f64>, max: Option<f64> },
    /// Integer with an inclusive lower bound; integer strings are accepted
    Integer { min: Option<i64> },
    /// Array whose every item matches the inner node
    ArrayOf(Box<SchemaNode>),
    /// Value matches at least one alternative
    AnyOf(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Short human-readable description of what the node expects
    #[must_use]
    pub fn expectation(&self) -> String {
        match self {
            Self::Object { .. } => "an object".to_string(),
            Self::TypeTag(tag) => format!("\"{tag}\""),
            Self::String => "a string".to_string(),
            Self::NonEmptyString => "a non-empty string".to_string(),
            Self::Uri => "a URI".to_string(),
            Self::Pattern(re) => format!("a string matching {}", re.as_str()),
            Self::Enum(values) => format!("one of {}", values.join(", ")),
            Self::Number { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("a number between {lo} and {hi}"),
                (Some(lo), None) => format!("a number >= {lo}"),
                (None, Some(hi)) => format!("a number <= {hi}"),
                (None, None) => "a number".to_string(),
            },
            Self::Integer { min: Some(lo) } => format!("an integer >= {lo}"),
            Self::Integer { min: None } => "an integer".to_string(),
            Self::ArrayOf(inner) => format!("an array of {}", plural(&inner.expectation())),
            Self::AnyOf(alternatives) => alternatives
                .iter()
                .map(SchemaNode::expectation)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Render the node as a JSON Schema (draft 2020-12 vocabulary)
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Object {
                properties,
                required,
            } => {
                let mut props = Map::new();
                for (name, node) in properties {
                    props.insert((*name).to_string(), node.to_json_schema());
                }
                let mut schema = json!({ "type": "object", "properties": props });
                if !required.is_empty() {
                    schema["required"] = json!(required);
                }
                schema
            }
            Self::TypeTag(tag) => json!({
                "anyOf": [
                    { "const": tag },
                    { "type": "array", "contains": { "const": tag } }
                ]
            }),
            Self::String => json!({ "type": "string" }),
            Self::NonEmptyString => json!({ "type": "string", "minLength": 1 }),
            Self::Uri => json!({ "type": "string", "format": "uri" }),
            Self::Pattern(re) => json!({ "type": "string", "pattern": re.as_str() }),
            Self::Enum(values) => json!({ "type": "string", "enum": values }),
            Self::Number { min, max } => {
                let mut schema = json!({ "type": ["number", "string"] });
                if let Some(lo) = min {
                    schema["minimum"] = json!(lo);
                }
                if let Some(hi) = max {
                    schema["maximum"] = json!(hi);
                }
                schema
            }
            Self::Integer { min } => {
                let mut schema = json!({ "type": ["integer", "string"] });
                if let Some(lo) = min {
                    schema["minimum"] = json!(lo);
                }
                schema
            }
            Self::ArrayOf(inner) => json!({ "type": "array", "items": inner.to_json_schema() }),
            Self::AnyOf(alternatives) => json!({
                "anyOf": alternatives.iter().map(SchemaNode::to_json_schema).collect::<Vec<_>>()
            }),
        }
    }

    /// Look up a direct property node of an object node
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            Self::Object { properties, .. } => properties
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }
}

fn plural(expectation: &str) -> String {
    // "a URI" -> "URIs", "an object" -> "objects"
    let noun = expectation
        .strip_prefix("an ")
        .or_else(|| expectation.strip_prefix("a "))
        .unwrap_or(expectation);
    format!("{noun}s")
}
