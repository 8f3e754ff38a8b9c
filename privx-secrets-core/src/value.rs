//! The node type of a secret document.
//!
//! A secret document arrives as JSON. Only two shapes are meaningful to the
//! renderers: strings ([`Value::Scalar`]) and objects ([`Value::Compound`]).
//! Everything else is kept as [`Value::Unsupported`] so that a stray number
//! or boolean only fails when a request actually reaches it.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// A decoded store response: top-level member name to value.
pub type Document = BTreeMap<String, Value>;

/// A node of a secret document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A leaf string.
    Scalar(String),
    /// A mapping from member name to child node. Member order carries no
    /// meaning.
    Compound(BTreeMap<String, Value>),
    /// A JSON shape that cannot be rendered.
    Unsupported(Shape),
}

/// JSON shapes outside of strings and objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Bool,
    Number,
    Array,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::Array => "array",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Name of this node's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "string",
            Value::Compound(_) => "object",
            Value::Unsupported(shape) => shape.as_str(),
        }
    }

    /// Looks up a direct member of a compound value.
    ///
    /// Returns `None` for scalars and unsupported shapes as well as for
    /// absent members.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Compound(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => Value::Scalar(s),
            serde_json::Value::Object(members) => Value::Compound(
                members
                    .into_iter()
                    .map(|(key, child)| (key, Value::from(child)))
                    .collect(),
            ),
            serde_json::Value::Null => Value::Unsupported(Shape::Null),
            serde_json::Value::Bool(_) => Value::Unsupported(Shape::Bool),
            serde_json::Value::Number(_) => Value::Unsupported(Shape::Number),
            serde_json::Value::Array(_) => Value::Unsupported(Shape::Array),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Compound(
            iter.into_iter()
                .map(|(key, child)| (key.into(), child.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
