//! Core type definitions for Lexigraph
//!
//! This module contains the vocabulary types shared by the dispatch engine,
//! the serialisation framework and the key codec: interned identifier
//! newtypes and the typed property `Value`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Group label classifying an element within the schema
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(Arc<str>);

/// Opaque vertex identifier; the core never interprets its content
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vertex(Arc<str>);

/// Compact property key using interned strings for efficiency
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey(Arc<str>);

/// Property map; ordered so key encodings are deterministic
pub type Properties = BTreeMap<PropertyKey, Value>;

/// Typed property value
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Point in time as signed epoch milliseconds
    Time(i64),
}

/// Discriminator for `Value` variants, used by serialisers' `can_handle`
/// dispatch and as the kind byte in value payloads
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Null value
    Null = 0,
    /// Boolean value
    Bool = 1,
    /// 64-bit signed integer
    Long = 2,
    /// 64-bit floating point
    Double = 3,
    /// String value
    String = 4,
    /// Binary data
    Bytes = 5,
    /// Point in time as signed epoch milliseconds
    Time = 6,
}

macro_rules! interned_str {
    ($name:ident) => {
        impl $name {
            /// Create from any string-like value
            pub fn new(s: impl Into<Arc<str>>) -> Self {
                Self(s.into())
            }

            /// Get string reference
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get the raw bytes of the identifier
            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self(s.into()))
            }
        }
    };
}

interned_str!(Group);
interned_str!(Vertex);
interned_str!(PropertyKey);

impl ValueKind {
    /// Human-readable kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Long => "long",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Time => "time",
        }
    }

    /// Decode a kind from its wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ValueKind::Null),
            1 => Some(ValueKind::Bool),
            2 => Some(ValueKind::Long),
            3 => Some(ValueKind::Double),
            4 => Some(ValueKind::String),
            5 => Some(ValueKind::Bytes),
            6 => Some(ValueKind::Time),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Value {
    /// Discriminator of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Long(_) => ValueKind::Long,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Time(_) => ValueKind::Time,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get value as integer
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Get value as float
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Get value as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get value as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get value as epoch milliseconds
    pub fn as_time(&self) -> Option<i64> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            // Bitwise so the round-trip law is exact, -0.0 != 0.0
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

// Convenient constructors
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_wire_byte() {
        for kind in [
            ValueKind::Null,
            ValueKind::Bool,
            ValueKind::Long,
            ValueKind::Double,
            ValueKind::String,
            ValueKind::Bytes,
            ValueKind::Time,
        ] {
            assert_eq!(ValueKind::from_u8(kind as u8), Some(kind));
        }
        assert_eq!(ValueKind::from_u8(200), None);
    }

    #[test]
    fn double_equality_is_bitwise() {
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(Value::Double(1.5), Value::Double(1.5));
    }

    #[test]
    fn interned_newtypes_compare_by_content() {
        assert_eq!(Group::from("BasicEntity"), Group::new("BasicEntity"));
        assert_eq!(Vertex::from("v1").as_str(), "v1");
        assert_eq!(PropertyKey::from("count").as_bytes(), b"count");
    }
}
