//! Generic structural check of a JSON value against a `SchemaNode` tree
//!
//! Reports every violation rather than stopping at the first one.

use serde_json::Value;

use crate::product_schema::SchemaNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required property is absent or `null`
    Missing,
    /// The value does not satisfy the node
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted path, with `[i]` for array items
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    /// Last property name on the path, without array indices
    #[must_use]
    pub fn field_name(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        last.split('[').next().unwrap_or(last)
    }
}

/// Check `value` against `node`, collecting violations
#[must_use]
pub fn check(value: &Value, node: &SchemaNode) -> Vec<Violation> {
    let mut out = Vec::new();
    check_at(value, node, "", &mut out);
    out
}

fn check_at(value: &Value, node: &SchemaNode, path: &str, out: &mut Vec<Violation>) {
    match node {
        SchemaNode::Object {
            properties,
            required,
        } => {
            let Some(map) = value.as_object() else {
                out.push(invalid(path, node, value));
                return;
            };

            for name in *required {
                if map.get(*name).is_none_or(Value::is_null) {
                    let child = join(path, name);
                    out.push(Violation {
                        message: format!("{child}: required property is missing"),
                        path: child,
                        kind: ViolationKind::Missing,
                    });
                }
            }

            for (name, child_node) in properties {
                if let Some(child) = map.get(*name).filter(|v| !v.is_null()) {
                    check_at(child, child_node, &join(path, name), out);
                }
            }
        }
        SchemaNode::ArrayOf(item_node) => {
            let Some(items) = value.as_array() else {
                out.push(invalid(path, node, value));
                return;
            };
            for (i, item) in items.iter().enumerate() {
                check_at(item, item_node, &format!("{path}[{i}]"), out);
            }
        }
        SchemaNode::AnyOf(alternatives) => {
            let satisfied = alternatives.iter().any(|alt| {
                let mut scratch = Vec::new();
                check_at(value, alt, path, &mut scratch);
                scratch.is_empty()
            });
            if !satisfied {
                out.push(invalid(path, node, value));
            }
        }
        leaf => {
            if !leaf_matches(value, leaf) {
                out.push(invalid(path, leaf, value));
            }
        }
    }
}

fn leaf_matches(value: &Value, node: &SchemaNode) -> bool {
    match node {
        SchemaNode::TypeTag(tag) => match value {
            Value::String(s) => s == tag,
            Value::Array(types) => types.iter().any(|t| t.as_str() == Some(*tag)),
            _ => false,
        },
        SchemaNode::String => value.is_string(),
        SchemaNode::NonEmptyString => value.as_str().is_some_and(|s| !s.is_empty()),
        SchemaNode::Uri => value
            .as_str()
            .is_some_and(|s| url::Url::parse(s.trim()).is_ok()),
        SchemaNode::Pattern(re) => value.as_str().is_some_and(|s| re.is_match(s)),
        SchemaNode::Enum(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
        SchemaNode::Number { min, max } => lenient_number(value).is_some_and(|n| {
            min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
        }),
        SchemaNode::Integer { min } => {
            lenient_integer(value).is_some_and(|n| min.is_none_or(|lo| n >= lo))
        }
        SchemaNode::Object { .. } | SchemaNode::ArrayOf(_) | SchemaNode::AnyOf(_) => true,
    }
}

/// Numbers, or strings that parse as numbers (JSON-LD often quotes them)
fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn lenient_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn invalid(path: &str, node: &SchemaNode, value: &Value) -> Violation {
    let shown = if path.is_empty() { "candidate" } else { path };
    Violation {
        path: path.to_string(),
        kind: ViolationKind::Invalid,
        message: format!(
            "{shown}: expected {}, got {}",
            node.expectation(),
            describe(value)
        ),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(40).collect();
            format!("\"{head}...\"")
        }
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
