//! Barrier id lists crossed by a street segment.
//!
//! Barrier fields arrive as bracket-encoded strings (`"[3, 7]"`, `"[]"`) and
//! are decoded once at load time; the string form is never kept.

use serde::{Deserialize, Serialize};

use super::{AttributeMap, AttributeValue};
use crate::config::FieldNames;
use crate::{Error, Result};

/// Typed barrier lists of one edge.
///
/// "No barriers" is always an empty list, never an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barriers {
    /// Barriers the segment runs along on the positive side.
    pub positive: Vec<i64>,
    /// Barriers the segment runs along on the negative side.
    pub negative: Vec<i64>,
    /// Deduplicated union of `positive` and `negative`, first-seen order.
    pub merged: Vec<i64>,
    /// Waterways crossed.
    pub water: Vec<i64>,
    /// Parks crossed.
    pub parks: Vec<i64>,
}

impl Barriers {
    pub fn new(positive: Vec<i64>, negative: Vec<i64>, water: Vec<i64>, parks: Vec<i64>) -> Self {
        let mut merged = Vec::with_capacity(positive.len() + negative.len());
        for id in positive.iter().chain(negative.iter()) {
            if !merged.contains(id) {
                merged.push(*id);
            }
        }
        Self { positive, negative, merged, water, parks }
    }

    /// Decode the four bracket-encoded fields of an attribute bag.
    ///
    /// A missing field decodes like `"[]"`.
    pub fn from_attributes(
        attrs: &AttributeMap,
        positive: &str,
        negative: &str,
        water: &str,
        parks: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            decode_field(attrs, positive)?,
            decode_field(attrs, negative)?,
            decode_field(attrs, water)?,
            decode_field(attrs, parks)?,
        ))
    }

    /// Decode the barrier fields named by `fields` and remove their string
    /// form from `attrs`. Nothing is removed if decoding fails.
    pub fn take_from(attrs: &mut AttributeMap, fields: &FieldNames) -> Result<Self> {
        let barriers = Self::from_attributes(
            attrs,
            &fields.positive_barriers,
            &fields.negative_barriers,
            &fields.water_crossings,
            &fields.park_crossings,
        )?;
        for field in [
            &fields.positive_barriers,
            &fields.negative_barriers,
            &fields.water_crossings,
            &fields.park_crossings,
        ] {
            attrs.remove(field.as_str());
        }
        Ok(barriers)
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty() && self.water.is_empty() && self.parks.is_empty()
    }
}

fn decode_field(attrs: &AttributeMap, field: &str) -> Result<Vec<i64>> {
    match attrs.get(field) {
        None | Some(AttributeValue::Null) => Ok(Vec::new()),
        Some(AttributeValue::String(raw)) => parse_bracket_list(field, raw),
        Some(AttributeValue::List(items)) => items
            .iter()
            .map(|v| v.as_int().ok_or_else(|| Error::BarrierParse {
                field: field.to_string(),
                value: v.to_string(),
            }))
            .collect(),
        Some(other) => Err(Error::AttributeType {
            name: field.to_string(),
            expected: "STRING",
            got: other.type_name(),
        }),
    }
}

/// Decode a bracket-encoded integer list.
///
/// `"[]"` is the empty list; otherwise every character other than a digit or
/// `-` acts as a separator and the remaining tokens parse as signed integers.
pub fn parse_bracket_list(field: &str, raw: &str) -> Result<Vec<i64>> {
    if raw == "[]" {
        return Ok(Vec::new());
    }
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_digit() || c == '-' { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .map(|token| token.parse::<i64>().map_err(|_| Error::BarrierParse {
            field: field.to_string(),
            value: raw.to_string(),
        }))
        .collect()
}
