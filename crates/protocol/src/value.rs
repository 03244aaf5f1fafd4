//! Attribute values
//!
//! `AnyValue` is the scalar type stored in attribute maps. `Attributes` keeps
//! keys sorted so debug output and comparisons are deterministic.

use std::collections::BTreeMap;
use std::fmt;

/// A scalar attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    /// UTF-8 string
    Str(String),
    /// Boolean
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float
    Double(f64),
}

impl AnyValue {
    /// Get the value as a string slice, if it is a string
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a float, if it is numeric
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
        }
    }
}

impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for AnyValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AnyValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AnyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AnyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AnyValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

/// Attribute map (string keys, scalar values)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, AnyValue>);

impl Attributes {
    /// Create an empty attribute map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an attribute
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnyValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an attribute by key
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.0.get(key)
    }

    /// Check if a key is present
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of attributes
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the map is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AnyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
