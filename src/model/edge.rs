//! Edge (street segment, or turning relation in a dual graph).

use geo::{Centroid, Coord, Euclidean, Length, LineString, Point};
use serde::{Deserialize, Serialize};

use super::{AttributeMap, Barriers, NodeId, RegionId, RouteDensities};
use crate::config::FieldNames;
use crate::Result;

/// Arena index of an edge within its owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena index of a directed edge within its owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectedEdgeId(pub usize);

/// Segment identifier from the input layer (`edgeID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub i64);

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One traversal direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectedEdge {
    pub id: DirectedEdgeId,
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Second coordinate of the line as seen from `from`.
    pub direction_pt: (f64, f64),
    /// Whether this direction follows the line's coordinate order.
    pub along_line: bool,
}

/// A graph edge backed by a line geometry.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub segment_id: SegmentId,
    pub region: RegionId,
    /// Repeated points removed; always at least two distinct coordinates.
    pub line: LineString<f64>,
    pub u: NodeId,
    pub v: NodeId,
    /// The node representing this edge in the dual graph.
    pub dual_node: Option<NodeId>,
    /// Deflection angle in degrees; only meaningful on dual-graph edges.
    pub deflection: Option<f64>,
    pub barriers: Barriers,
    pub attributes: AttributeMap,
    /// `[u → v, v → u]`.
    pub directed: [DirectedEdgeId; 2],
    pub densities: RouteDensities,
}

impl Edge {
    /// The endpoint opposite to `node`, or `None` if `node` is not an endpoint.
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if node == self.u { Some(self.v) }
        else if node == self.v { Some(self.u) }
        else { None }
    }

    pub fn has_endpoint(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }

    /// Inter-region bridge: excluded from region-scoped navigation.
    pub fn is_bridge(&self) -> bool {
        self.region.is_none()
    }

    pub fn length(&self) -> f64 {
        Euclidean.length(&self.line)
    }

    pub fn centroid(&self) -> Option<Point<f64>> {
        self.line.centroid()
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.line.coords()
    }

    /// Decode the bracket-encoded barrier fields of the attribute bag into
    /// `barriers`, dropping the string form.
    pub fn set_barriers(&mut self, fields: &FieldNames) -> Result<()> {
        self.barriers = Barriers::take_from(&mut self.attributes, fields)?;
        Ok(())
    }

    /// Zero the route density counters.
    pub fn reset_densities(&self) {
        self.densities.reset();
    }
}
