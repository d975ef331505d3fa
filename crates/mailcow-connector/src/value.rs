//! Typed configuration values
//!
//! Field values carried in desired/observed state, plus the coercions
//! applied at the wire boundary: booleans serialize as 0/1, and remote
//! values of varying JSON shape decode back through the field's declared
//! kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{ConnectorError, ConnectorResult};

/// Semantic type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Boolean flag (0/1 on the wire)
    Bool,
    /// Base-10 integer
    Integer,
    /// Free-form string
    Text,
    /// List of strings
    TextList,
}

impl FieldKind {
    /// Get the string representation used in diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Integer => "integer",
            FieldKind::Text => "text",
            FieldKind::TextList => "text list",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed value for a configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A string value.
    Text(String),
    /// A list of strings.
    TextList(Vec<String>),
}

impl FieldValue {
    /// Get the kind of this value.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Integer,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::TextList(_) => FieldKind::TextList,
        }
    }

    /// Get as a boolean if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as an integer if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as a string slice if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a string list if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Render this value the way it appears in diagnostics and id joins.
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::TextList(items) => items.join(","),
        }
    }

    /// Convert this value to its wire representation.
    ///
    /// Booleans become the integers 1/0; the remote API encodes booleans
    /// that way regardless of declared type.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Number(i64::from(*b).into()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::TextList(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::TextList(items.into_iter().map(str::to_string).collect())
    }
}

/// Render a scalar JSON value as bare text.
///
/// Strings render without quotes; everything else uses its JSON form.
#[must_use]
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a remote JSON value through a field's declared kind.
///
/// The remote API is loosely typed: booleans arrive as `"1"`/`"0"`
/// strings, native 0/1 numbers or real booleans; integers arrive as
/// numbers or numeric strings. A value that cannot be read through the
/// declared kind is a `TypeMismatch`, never silently defaulted.
pub fn decode(kind: FieldKind, field: &str, remote: &Value) -> ConnectorResult<FieldValue> {
    match kind {
        FieldKind::Bool => decode_bool(field, remote).map(FieldValue::Bool),
        FieldKind::Integer => decode_integer(field, remote).map(FieldValue::Int),
        FieldKind::Text => decode_text(field, remote).map(FieldValue::Text),
        FieldKind::TextList => decode_text_list(field, remote).map(FieldValue::TextList),
    }
}

fn mismatch(field: &str, expected: FieldKind, remote: &Value) -> ConnectorError {
    ConnectorError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: remote.to_string(),
    }
}

fn decode_bool(field: &str, remote: &Value) -> ConnectorResult<bool> {
    match remote {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Ok(f >= 1.0),
            None => Err(mismatch(field, FieldKind::Bool, remote)),
        },
        Value::String(s) => match s.as_str() {
            "1" => Ok(true),
            "0" | "" => Ok(false),
            _ => Err(mismatch(field, FieldKind::Bool, remote)),
        },
        _ => Err(mismatch(field, FieldKind::Bool, remote)),
    }
}

fn decode_integer(field: &str, remote: &Value) -> ConnectorResult<i64> {
    match remote {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f as i64)
            } else {
                Err(mismatch(field, FieldKind::Integer, remote))
            }
        }
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| mismatch(field, FieldKind::Integer, remote)),
        _ => Err(mismatch(field, FieldKind::Integer, remote)),
    }
}

fn decode_text(field: &str, remote: &Value) -> ConnectorResult<String> {
    match remote {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(mismatch(field, FieldKind::Text, remote)),
    }
}

fn decode_text_list(field: &str, remote: &Value) -> ConnectorResult<Vec<String>> {
    match remote {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().map(scalar_to_string).collect()),
        _ => Err(mismatch(field, FieldKind::TextList, remote)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_to_wire() {
        assert_eq!(FieldValue::Bool(true).to_wire(), json!(1));
        assert_eq!(FieldValue::Bool(false).to_wire(), json!(0));
    }

    #[test]
    fn test_text_and_list_to_wire() {
        assert_eq!(FieldValue::from("x@y.z").to_wire(), json!("x@y.z"));
        assert_eq!(
            FieldValue::from(vec!["a", "b"]).to_wire(),
            json!(["a", "b"])
        );
    }

    #[test]
    fn test_decode_bool_strings_exhaustive() {
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!("1")).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!("0")).unwrap(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!("")).unwrap(),
            FieldValue::Bool(false)
        );
        let err = decode(FieldKind::Bool, "active", &json!("yes")).unwrap_err();
        assert_eq!(err.error_code(), "TYPE_MISMATCH");
    }

    #[test]
    fn test_decode_bool_native_representations() {
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!(1)).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!(0)).unwrap(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            decode(FieldKind::Bool, "active", &json!(true)).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            decode(FieldKind::Bool, "active", &Value::Null).unwrap(),
            FieldValue::Bool(false)
        );
    }

    #[test]
    fn test_decode_integer() {
        assert_eq!(
            decode(FieldKind::Integer, "quota", &json!(400)).unwrap(),
            FieldValue::Int(400)
        );
        assert_eq!(
            decode(FieldKind::Integer, "quota", &json!("2048")).unwrap(),
            FieldValue::Int(2048)
        );
        assert!(decode(FieldKind::Integer, "quota", &json!("lots")).is_err());
        assert!(decode(FieldKind::Integer, "quota", &json!(true)).is_err());
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(
            decode(FieldKind::Text, "description", &json!("hi")).unwrap(),
            FieldValue::from("hi")
        );
        assert_eq!(
            decode(FieldKind::Text, "length", &json!(2048)).unwrap(),
            FieldValue::from("2048")
        );
        assert!(decode(FieldKind::Text, "description", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_decode_text_list() {
        assert_eq!(
            decode(FieldKind::TextList, "tags", &Value::Null).unwrap(),
            FieldValue::TextList(Vec::new())
        );
        assert_eq!(
            decode(FieldKind::TextList, "tags", &json!(["a", 2])).unwrap(),
            FieldValue::from(vec!["a", "2"])
        );
        assert!(decode(FieldKind::TextList, "tags", &json!("a")).is_err());
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("plain")), "plain");
        assert_eq!(scalar_to_string(&json!(12)), "12");
        assert_eq!(scalar_to_string(&json!(true)), "true");
    }
}
