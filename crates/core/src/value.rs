//! Property values - the primitive set the graph store accepts

use serde::{Deserialize, Serialize};

/// A property value on a node or edge.
///
/// The graph store only accepts flat primitives; anything richer is coerced
/// to text via [`PropertyValue::coerce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    /// Coerce an arbitrary JSON value into the primitive set.
    ///
    /// Values already in the set pass through unchanged. Everything else is
    /// stringified and the kind of fallback is returned alongside, so the
    /// caller can record a warning instead of failing the record.
    pub fn coerce(value: &serde_json::Value) -> (Self, Option<CoercionKind>) {
        match value {
            serde_json::Value::Bool(b) => (Self::Bool(*b), None),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    (Self::Int(i), None)
                } else {
                    (Self::Float(n.as_f64().unwrap_or(0.0)), None)
                }
            }
            serde_json::Value::String(s) => (Self::Text(s.clone()), None),
            serde_json::Value::Null => (Self::Text(String::new()), Some(CoercionKind::Null)),
            other => {
                let text = other.to_string();
                (Self::Text(text), Some(CoercionKind::Nested))
            }
        }
    }

    /// Render the value as plain text, for the stringify-and-retry fallback.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Why a property value had to be stringified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionKind {
    /// Value was null/absent; stored as an empty string
    Null,
    /// Value was a list or nested object; stored as its JSON text
    Nested,
}

/// A record of one fallback stringification, surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoercionWarning {
    /// Stable key of the node or edge that owns the property
    pub owner: String,
    /// Property name that was coerced
    pub property: String,
    pub kind: CoercionKind,
}

impl std::fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CoercionKind::Null => write!(
                f,
                "{}: property '{}' was null, stored as empty string",
                self.owner, self.property
            ),
            CoercionKind::Nested => write!(
                f,
                "{}: property '{}' was not a primitive, stored as JSON text",
                self.owner, self.property
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives_pass_through() {
        let (v, w) = PropertyValue::coerce(&json!("hello"));
        assert_eq!(v, PropertyValue::Text("hello".into()));
        assert!(w.is_none());

        let (v, w) = PropertyValue::coerce(&json!(42));
        assert_eq!(v, PropertyValue::Int(42));
        assert!(w.is_none());

        let (v, w) = PropertyValue::coerce(&json!(2.5));
        assert_eq!(v, PropertyValue::Float(2.5));
        assert!(w.is_none());

        let (v, w) = PropertyValue::coerce(&json!(true));
        assert_eq!(v, PropertyValue::Bool(true));
        assert!(w.is_none());
    }

    #[test]
    fn test_null_coerces_to_empty_string() {
        let (v, w) = PropertyValue::coerce(&json!(null));
        assert_eq!(v, PropertyValue::Text(String::new()));
        assert_eq!(w, Some(CoercionKind::Null));
    }

    #[test]
    fn test_nested_values_stringified() {
        let (v, w) = PropertyValue::coerce(&json!([1, 2, 3]));
        assert_eq!(v, PropertyValue::Text("[1,2,3]".into()));
        assert_eq!(w, Some(CoercionKind::Nested));

        let (v, w) = PropertyValue::coerce(&json!({"a": 1}));
        assert_eq!(v, PropertyValue::Text("{\"a\":1}".into()));
        assert_eq!(w, Some(CoercionKind::Nested));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(PropertyValue::Int(7).to_text(), "7");
        assert_eq!(PropertyValue::Bool(false).to_text(), "false");
        assert_eq!(PropertyValue::Text("x".into()).to_text(), "x");
    }
}
