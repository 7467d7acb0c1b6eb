//! core::value
//!
//! Property values and frozen property bags.
//!
//! # Types
//!
//! - [`Value`] - A value as handed over by the scripting runtime
//! - [`PropertyBag`] - The immutable, string-keyed map stored on a node
//!
//! A scripting dict may carry keys of any type, so [`Value::Dict`] is a list
//! of `(Value, Value)` entries. Only dicts whose keys are all strings can
//! become a [`PropertyBag`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from turning a [`Value`] into a [`PropertyBag`].
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("property bag has non-string key {0}")]
    NonStringKey(String),

    #[error("property bag must be a dict, got {0}")]
    NotADict(&'static str),
}

/// A dynamically typed value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Build a dict from key/value pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use cfgraph::core::value::Value;
    ///
    /// let props = Value::dict([("port", Value::from(80)), ("tls", Value::from(true))]);
    /// assert_eq!(props.type_name(), "dict");
    /// ```
    pub fn dict<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

}

// Dict equality ignores entry order, like the scripting runtime's dicts.
// NaN equals NaN so that idempotent redeclarations with NaN properties match.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => same_entries(a, b),
            _ => false,
        }
    }
}

/// Multiset comparison: every entry of `a` pairs with a distinct equal
/// entry of `b`.
fn same_entries(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|entry| {
        match (0..b.len()).find(|&i| !used[i] && *entry == b[i]) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    match k {
                        Value::Str(s) => map.serialize_entry(s, v)?,
                        other => map.serialize_entry(&other.to_string(), v)?,
                    }
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// An immutable, string-keyed property map.
///
/// Clones share storage. Equality compares contents.
///
/// # Example
///
/// ```
/// use cfgraph::core::value::{PropertyBag, Value};
///
/// let bag = PropertyBag::from_value(Value::dict([("port", 80)])).unwrap();
/// assert_eq!(bag.get("port"), Some(&Value::Int(80)));
///
/// let bad = Value::dict([(Value::Int(1), Value::from("x"))]);
/// assert!(PropertyBag::from_value(bad).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag(Arc<BTreeMap<String, Value>>);

impl PropertyBag {
    /// Freeze a dict value into a property bag. `Null` yields an empty bag.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::NonStringKey` for the first non-string key,
    /// or `PropertyError::NotADict` if `value` is neither a dict nor null.
    pub fn from_value(value: Value) -> Result<Self, PropertyError> {
        let entries = match value {
            Value::Null => return Ok(Self::default()),
            Value::Dict(entries) => entries,
            other => return Err(PropertyError::NotADict(other.type_name())),
        };

        let mut map = BTreeMap::new();
        for (k, v) in entries {
            match k {
                Value::Str(name) => {
                    map.insert(name, v);
                }
                other => return Err(PropertyError::NonStringKey(other.to_string())),
            }
        }
        Ok(Self(Arc::new(map)))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_becomes_empty_bag() {
        let bag = PropertyBag::from_value(Value::Null).unwrap();
        assert!(bag.is_empty());
    }

    #[test]
    fn non_dict_is_rejected() {
        assert_eq!(
            PropertyBag::from_value(Value::from(3)),
            Err(PropertyError::NotADict("int"))
        );
    }

    #[test]
    fn non_string_key_is_rejected() {
        let value = Value::dict([
            (Value::from("ok"), Value::from(1)),
            (Value::Bool(true), Value::from(2)),
        ]);
        assert_eq!(
            PropertyBag::from_value(value),
            Err(PropertyError::NonStringKey("true".into()))
        );
    }

    #[test]
    fn bag_equality_is_structural() {
        let a = PropertyBag::from_value(Value::dict([("x", 1), ("y", 2)])).unwrap();
        let b = PropertyBag::from_value(Value::dict([("y", 2), ("x", 1)])).unwrap();
        assert_eq!(a, b);

        let c = PropertyBag::from_value(Value::dict([("x", 1), ("y", 3)])).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn nested_dict_equality_ignores_entry_order() {
        let a = Value::dict([("a", 1), ("b", 2)]);
        let b = Value::dict([("b", 2), ("a", 1)]);
        assert_eq!(a, b);
        assert_ne!(a, Value::dict([("a", 1)]));
    }

    #[test]
    fn dict_equality_is_symmetric_with_repeated_keys() {
        let repeated = Value::dict([("x", 1), ("x", 1)]);
        let distinct = Value::dict([("x", 1), ("y", 2)]);
        assert_eq!(repeated == distinct, distinct == repeated);
        assert_ne!(repeated, distinct);
        assert_ne!(distinct, repeated);
        assert_eq!(repeated, Value::dict([("x", 1), ("x", 1)]));
    }

    #[test]
    fn nan_equals_nan() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(Value::Float(f64::NAN), Value::Float(1.0));
    }

    #[test]
    fn serializes_as_json_object() {
        let bag = PropertyBag::from_value(Value::dict([
            ("name", Value::from("api")),
            ("ports", Value::from(vec![Value::from(80), Value::from(443)])),
            ("extra", Value::Null),
        ]))
        .unwrap();
        let json = serde_json::to_string(&bag).unwrap();
        assert_eq!(json, r#"{"extra":null,"name":"api","ports":[80,443]}"#);
    }

    #[test]
    fn display_is_script_like() {
        let value = Value::dict([("a", Value::from(vec![Value::from(1), Value::from("x")]))]);
        assert_eq!(value.to_string(), r#"{"a": [1, "x"]}"#);
    }
}
