//! Feature: a geometry plus its attribute bag, as read from a GIS layer.

use geo::{Coord, Geometry, LineString, Point};

use super::{AttributeMap, AttributeValue};

/// A GIS feature: street segment, junction point, building footprint,
/// sight line, centroid. Which attributes are present depends on the layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub attributes: AttributeMap,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>, attributes: AttributeMap) -> Self {
        Self { geometry, attributes }
    }

    /// A line feature from a coordinate sequence.
    pub fn line(coords: impl IntoIterator<Item = (f64, f64)>, attributes: AttributeMap) -> Self {
        let coords: Vec<Coord<f64>> = coords.into_iter().map(|(x, y)| Coord { x, y }).collect();
        Self::new(Geometry::LineString(LineString::new(coords)), attributes)
    }

    /// A point feature.
    pub fn point(x: f64, y: f64, attributes: AttributeMap) -> Self {
        Self::new(Geometry::Point(Point::new(x, y)), attributes)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn as_line_string(&self) -> Option<&LineString<f64>> {
        match &self.geometry {
            Geometry::LineString(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point<f64>> {
        match &self.geometry {
            Geometry::Point(p) => Some(*p),
            _ => None,
        }
    }
}
