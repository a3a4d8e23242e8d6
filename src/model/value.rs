//! Attribute value type carried by input features.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value from a GIS feature's attribute table.
///
/// Shapefile/GeoPackage columns only ever hold scalars or flat lists, so the
/// type system is deliberately small:
/// - Scalars: Bool, Int, Float, String
/// - Containers: List
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
}

// ============================================================================
// Type checking
// ============================================================================

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "NULL",
            AttributeValue::Bool(_) => "BOOLEAN",
            AttributeValue::Int(_) => "INTEGER",
            AttributeValue::Float(_) => "FLOAT",
            AttributeValue::String(_) => "STRING",
            AttributeValue::List(_) => "LIST",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, AttributeValue::Null) }
    pub fn is_numeric(&self) -> bool { matches!(self, AttributeValue::Int(_) | AttributeValue::Float(_)) }

    /// Attempt to extract as i64.
    ///
    /// Whole floats are accepted: attribute tables exported from GIS tools
    /// routinely store integer ids in double columns.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            AttributeValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempt to extract as &str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view: booleans as-is, integers as `!= 0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ============================================================================
// From conversions
// ============================================================================

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self { AttributeValue::Bool(b) }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self { AttributeValue::Int(i as i64) }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self { AttributeValue::Int(i) }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self { AttributeValue::Float(f) }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self { AttributeValue::String(s.to_string()) }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self { AttributeValue::String(s) }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(v: Vec<T>) -> Self { AttributeValue::List(v.into_iter().map(Into::into).collect()) }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => AttributeValue::Null,
        }
    }
}
