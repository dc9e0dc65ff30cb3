//! Value types for Sparkle
//!
//! This module defines:
//! - Value: dynamically typed value compared by the assertion API and passed
//!   to case bodies as parameterized arguments
//!
//! ## Kind Rules
//!
//! - Different kinds are NEVER equal: `Int(1) != Float(1.0)`
//! - `Bytes` are not `String`
//! - `Opaque` values carry only a label and cannot be compared by assertions
//!
//! Assertion comparison (`Value::compare`) differs from `PartialEq` in two
//! ways: `NaN` compares equal to `NaN` so that every comparable value equals
//! itself, and any `Opaque` value makes the comparison undecidable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dynamically typed value used by assertions and case arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Object with string keys
    Object(BTreeMap<String, Value>),
    /// Handle-like value (connection, closure, stream) known only by a label.
    ///
    /// Opaque values can be carried as arguments but assertions refuse to
    /// compare them.
    Opaque(String),
}

/// Discriminant of a [`Value`], used for kind-mismatch checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Null
    Null,
    /// Bool
    Bool,
    /// Int
    Int,
    /// Float
    Float,
    /// String
    String,
    /// Bytes
    Bytes,
    /// Array
    Array,
    /// Object
    Object,
    /// Opaque
    Opaque,
}

impl ValueKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Bytes => "Bytes",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
            ValueKind::Opaque => "Opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing two values for an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same kind and same contents
    Equal,
    /// Kind, length or contents differ
    Different,
    /// At least one side holds a value that cannot be compared
    Incomparable,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Check whether assertions can compare this value.
    ///
    /// Containers are comparable only when every element is.
    pub fn is_comparable(&self) -> bool {
        match self {
            Value::Opaque(_) => false,
            Value::Array(items) => items.iter().all(Value::is_comparable),
            Value::Object(entries) => entries.values().all(Value::is_comparable),
            _ => true,
        }
    }

    /// Compare two values with assertion semantics.
    ///
    /// Kinds are checked first, then sequence lengths, then elements in
    /// order; the first element that is not `Equal` decides the outcome.
    /// Opaque values yield `Incomparable` once their kinds match.
    pub fn compare(&self, other: &Value) -> Comparison {
        if self.kind() != other.kind() {
            return Comparison::Different;
        }
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                if a.len() != b.len() {
                    return Comparison::Different;
                }
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y) {
                        Comparison::Equal => continue,
                        decided => return decided,
                    }
                }
                Comparison::Equal
            }
            (Value::Object(a), Value::Object(b)) => {
                if a.len() != b.len() {
                    return Comparison::Different;
                }
                for (key, x) in a {
                    let Some(y) = b.get(key) else {
                        return Comparison::Different;
                    };
                    match x.compare(y) {
                        Comparison::Equal => continue,
                        decided => return decided,
                    }
                }
                Comparison::Equal
            }
            (Value::Opaque(_), Value::Opaque(_)) => Comparison::Incomparable,
            (Value::Float(a), Value::Float(b)) if a == b || (a.is_nan() && b.is_nan()) => {
                Comparison::Equal
            }
            _ if self == other => Comparison::Equal,
            _ => Comparison::Different,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as map if this is an Object value
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "{:?}", b),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Opaque(label) => write!(f, "<{}>", label),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
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
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(o: BTreeMap<String, Value>) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// Sequences of element types become arrays. `Vec<u8>` stays `Bytes`.
macro_rules! impl_array_from {
    ($($elem:ty),* $(,)?) => {
        $(
            impl From<Vec<$elem>> for Value {
                fn from(items: Vec<$elem>) -> Self {
                    Value::Array(items.into_iter().map(Value::from).collect())
                }
            }

            impl<const N: usize> From<[$elem; N]> for Value {
                fn from(items: [$elem; N]) -> Self {
                    Value::Array(items.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

impl_array_from!(Value, bool, i32, i64, u32, usize, f64, String, &str);
