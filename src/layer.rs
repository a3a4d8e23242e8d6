//! VectorLayer: an R-tree indexed feature collection.
//!
//! This is the spatial-query surface the graph passes consume: buildings for
//! landmark assignment, junction points for sampling. The graph itself never
//! indexes anything beyond its coordinate map.
//!
//! All queries return feature indices into the layer, ascending. No match is
//! an empty list.

use geo::{BoundingRect, Contains, ConvexHull, Coord, CoordsIter, Intersects, MultiPoint, Point, Polygon};
use rstar::{primitives::{GeomWithData, Rectangle}, RTree, AABB};

use crate::geometry::distance_to_geometry;
use crate::model::{AttributeMapExt, AttributeValue, Feature};
use crate::Result;

type IndexEntry = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Attribute predicate for [`VectorLayer::filter_by_attribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeFilter {
    Equal(AttributeValue),
    NotEqual(AttributeValue),
    In(Vec<AttributeValue>),
    NotIn(Vec<AttributeValue>),
}

impl AttributeFilter {
    fn matches(&self, value: &AttributeValue) -> bool {
        match self {
            AttributeFilter::Equal(v) => loose_eq(value, v),
            AttributeFilter::NotEqual(v) => !loose_eq(value, v),
            AttributeFilter::In(vs) => vs.iter().any(|v| loose_eq(value, v)),
            AttributeFilter::NotIn(vs) => !vs.iter().any(|v| loose_eq(value, v)),
        }
    }
}

/// Equality that treats `Int(3)` and `Float(3.0)` as the same value.
fn loose_eq(a: &AttributeValue, b: &AttributeValue) -> bool {
    if a.is_numeric() && b.is_numeric() {
        a.as_float() == b.as_float()
    } else {
        a == b
    }
}

fn envelope_of(feature: &Feature) -> Option<Rectangle<[f64; 2]>> {
    let rect = feature.geometry.bounding_rect()?;
    Some(Rectangle::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    ))
}

pub struct VectorLayer {
    features: Vec<Feature>,
    tree: RTree<IndexEntry>,
}

impl Default for VectorLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VectorLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorLayer")
            .field("features", &self.features.len())
            .field("indexed", &self.tree.size())
            .finish()
    }
}

impl VectorLayer {
    pub fn new() -> Self {
        Self { features: Vec::new(), tree: RTree::new() }
    }

    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let features: Vec<Feature> = features.into_iter().collect();
        let entries: Vec<IndexEntry> = features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| envelope_of(f).map(|env| GeomWithData::new(env, i)))
            .collect();
        Self { features, tree: RTree::bulk_load(entries) }
    }

    /// Add a feature; returns its index. Empty geometries are stored but
    /// never match a spatial query.
    pub fn add(&mut self, feature: Feature) -> usize {
        let idx = self.features.len();
        if let Some(env) = envelope_of(&feature) {
            self.tree.insert(GeomWithData::new(env, idx));
        }
        self.features.push(feature);
        idx
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Feature> {
        self.features.get(idx)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    fn candidates(&self, min: [f64; 2], max: [f64; 2]) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_corners(min, max))
            .map(|entry| entry.data)
    }

    fn sorted(mut hits: Vec<usize>) -> Vec<usize> {
        hits.sort_unstable();
        hits
    }

    // ========================================================================
    // Spatial queries
    // ========================================================================

    /// Features whose geometry comes within `radius` of `origin`.
    pub fn features_within_distance(&self, origin: Coord<f64>, radius: f64) -> Vec<usize> {
        self.features_between_limits(origin, 0.0, radius)
    }

    /// Features whose distance from `origin` lies in `[lower, upper]`.
    pub fn features_between_limits(&self, origin: Coord<f64>, lower: f64, upper: f64) -> Vec<usize> {
        let hits = self
            .candidates([origin.x - upper, origin.y - upper], [origin.x + upper, origin.y + upper])
            .filter(|&i| {
                let d = distance_to_geometry(origin, &self.features[i].geometry);
                d >= lower && d <= upper
            })
            .collect();
        Self::sorted(hits)
    }

    pub fn features_intersecting(&self, area: &Polygon<f64>) -> Vec<usize> {
        let Some(rect) = area.bounding_rect() else { return Vec::new() };
        let hits = self
            .candidates([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
            .filter(|&i| self.features[i].geometry.intersects(area))
            .collect();
        Self::sorted(hits)
    }

    pub fn features_contained(&self, area: &Polygon<f64>) -> Vec<usize> {
        let Some(rect) = area.bounding_rect() else { return Vec::new() };
        let hits = self
            .candidates([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
            .filter(|&i| area.contains(&self.features[i].geometry))
            .collect();
        Self::sorted(hits)
    }

    // ========================================================================
    // Attribute queries
    // ========================================================================

    /// Features whose `name` attribute satisfies `filter`. Features without
    /// the attribute never match.
    pub fn filter_by_attribute(&self, name: &str, filter: &AttributeFilter) -> Vec<usize> {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.get(name).is_some_and(|v| filter.matches(v)))
            .map(|(i, _)| i)
            .collect()
    }

    /// A new layer holding copies of the selected features.
    pub fn subset(&self, indices: &[usize]) -> VectorLayer {
        VectorLayer::from_features(indices.iter().filter_map(|&i| self.features.get(i).cloned()))
    }

    pub fn int_column(&self, name: &str) -> Result<Vec<i64>> {
        self.features.iter().map(|f| f.attributes.get_int(name)).collect()
    }

    /// Convex hull of every coordinate in the layer.
    pub fn convex_hull(&self) -> Polygon<f64> {
        let points: Vec<Point<f64>> = self
            .features
            .iter()
            .flat_map(|f| f.geometry.coords_iter())
            .map(Point::from)
            .collect();
        MultiPoint::new(points).convex_hull()
    }
}
