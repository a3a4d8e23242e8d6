//! AttributeMap: the key-value bag carried by every input feature.

use std::collections::HashMap;

use super::AttributeValue;
use crate::{Error, Result};

/// A map of attribute names to values.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Typed reads over an attribute bag.
///
/// `get_*` fail with `MissingAttribute` / `AttributeType`; `find_*` treat a
/// missing or null attribute as absent and only fail on a type mismatch.
pub trait AttributeMapExt {
    fn get_int(&self, name: &str) -> Result<i64>;
    fn get_float(&self, name: &str) -> Result<f64>;
    fn get_str(&self, name: &str) -> Result<&str>;
    fn find_int(&self, name: &str) -> Result<Option<i64>>;
    fn find_float(&self, name: &str) -> Result<Option<f64>>;
    fn find_str(&self, name: &str) -> Result<Option<&str>>;
    fn find_bool(&self, name: &str) -> Result<Option<bool>>;
}

fn type_error(name: &str, expected: &'static str, got: &AttributeValue) -> Error {
    Error::AttributeType { name: name.to_string(), expected, got: got.type_name() }
}

impl AttributeMapExt for AttributeMap {
    fn get_int(&self, name: &str) -> Result<i64> {
        self.find_int(name)?
            .ok_or_else(|| Error::MissingAttribute { name: name.to_string() })
    }

    fn get_float(&self, name: &str) -> Result<f64> {
        self.find_float(name)?
            .ok_or_else(|| Error::MissingAttribute { name: name.to_string() })
    }

    fn get_str(&self, name: &str) -> Result<&str> {
        self.find_str(name)?
            .ok_or_else(|| Error::MissingAttribute { name: name.to_string() })
    }

    fn find_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None | Some(AttributeValue::Null) => Ok(None),
            Some(v) => v.as_int().map(Some).ok_or_else(|| type_error(name, "INTEGER", v)),
        }
    }

    fn find_float(&self, name: &str) -> Result<Option<f64>> {
        match self.get(name) {
            None | Some(AttributeValue::Null) => Ok(None),
            Some(v) => v.as_float().map(Some).ok_or_else(|| type_error(name, "FLOAT", v)),
        }
    }

    fn find_str(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            None | Some(AttributeValue::Null) => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| type_error(name, "STRING", v)),
        }
    }

    fn find_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name) {
            None | Some(AttributeValue::Null) => Ok(None),
            Some(v) => v.as_bool().map(Some).ok_or_else(|| type_error(name, "BOOLEAN", v)),
        }
    }
}
