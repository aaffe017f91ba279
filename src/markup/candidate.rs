//! Extracted product records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::product_schema::{PRODUCT_TYPE, TYPE_KEY};

/// Field map of one extracted schema.org `Product`
///
/// Values are kept as raw JSON so the validator sees exactly what the page
/// published. A candidate may lack required fields, but "no product on the
/// page" is expressed as `Option::None`, never as an empty candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCandidate(Map<String, Value>);

impl ProductCandidate {
    /// Wrap a JSON object as a candidate
    #[must_use]
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value; `None` unless it is an object
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Start a candidate carrying only the `Product` type discriminator
    #[must_use]
    pub fn typed() -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_KEY.to_string(), Value::String(PRODUCT_TYPE.to_string()));
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// True when the field exists and is not JSON `null`
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ProductCandidate {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Markup dialect a candidate was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupFormat {
    JsonLd,
    Microdata,
    Rdfa,
}

impl std::fmt::Display for MarkupFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JsonLd => write!(f, "JSON-LD"),
            Self::Microdata => write!(f, "microdata"),
            Self::Rdfa => write!(f, "RDFa"),
        }
    }
}

/// Outcome of a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// First product found in the winning format
    pub candidate: ProductCandidate,
    pub format: MarkupFormat,
    /// Products seen in the winning format, including the one returned
    pub products_seen: usize,
}
