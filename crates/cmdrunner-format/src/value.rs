//! Value rendering and classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared shape of a parameter, used by `typed_default`.
///
/// Parsed from configuration as `"list"`, `"bool"`, `"dict"` or `"str"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    List,
    Bool,
    #[serde(rename = "dict")]
    #[strum(serialize = "dict")]
    Map,
    #[serde(rename = "str")]
    #[strum(serialize = "str")]
    Other,
}

/// Render a value as a single token.
///
/// Strings are used verbatim, numbers and booleans use their JSON spelling,
/// `null` renders as `null`, lists and maps as compact JSON.
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `null`, `false`, zero, and empty strings, lists and maps are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
