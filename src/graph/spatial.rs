//! Geometric queries over nodes and edges.
//!
//! These are full scans: graphs are queried a handful of times per route, and
//! the layer-backed R-tree lives in `VectorLayer` for the heavy lookups.

use geo::{Contains, Coord, Distance, Euclidean, LineString, Point, Polygon};

use super::{Graph, SpatialScope};
use crate::geometry::{line_within_corridor, midpoint};
use crate::model::{EdgeId, NodeId, RegionId};
use crate::Result;

impl Graph {
    /// Euclidean distance between two nodes.
    pub fn node_distance(&self, a: NodeId, b: NodeId) -> Result<f64> {
        Ok(Euclidean.distance(self.require_node(a)?.coord, self.require_node(b)?.coord))
    }

    /// Center and radius of the circle having `a`–`b` as diameter.
    pub fn enclosing_circle(&self, a: NodeId, b: NodeId) -> Result<(Coord<f64>, f64)> {
        let ca = self.require_node(a)?.coord;
        let cb = self.require_node(b)?.coord;
        Ok((midpoint(ca, cb), Euclidean.distance(ca, cb) / 2.0))
    }

    /// Straight line from `a` to `b`.
    pub fn line_between(&self, a: NodeId, b: NodeId) -> Result<LineString<f64>> {
        let ca = self.require_node(a)?.coord;
        let cb = self.require_node(b)?.coord;
        Ok(LineString::new(vec![ca, cb]))
    }

    /// Nodes strictly inside `area`.
    pub fn contained_nodes(&self, area: &Polygon<f64>) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| area.contains(&Point::from(n.coord)))
            .map(|n| n.id)
            .collect()
    }

    /// Edges whose line lies inside `area`.
    pub fn contained_edges(&self, area: &Polygon<f64>) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| area.contains(&e.line))
            .map(|e| e.id)
            .collect()
    }

    /// Nodes inside a spatial scope, in id order.
    pub fn nodes_in_scope(&self, scope: &SpatialScope) -> Result<Vec<NodeId>> {
        let ring = scope.resolve(self)?;
        Ok(self.nodes.iter().filter(|n| ring.contains(n.coord)).map(|n| n.id).collect())
    }

    /// Edges lying entirely within the search space of an origin/destination
    /// pair: the convex hull of two discs of radius
    /// `max(min_radius, distance_factor × |OD|)` centred on the endpoints.
    pub fn edges_within_space(&self, origin: NodeId, destination: NodeId) -> Result<Vec<EdgeId>> {
        let o = self.require_node(origin)?.coord;
        let d = self.require_node(destination)?.coord;
        let space = &self.config.space;
        let radius = space.min_radius.max(space.distance_factor * Euclidean.distance(o, d));

        let edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| line_within_corridor(&e.line, o, d, radius))
            .map(|e| e.id)
            .collect();
        tracing::trace!(graph = %self.id, %origin, %destination, radius, edges = edges.len(), "search space");
        Ok(edges)
    }

    /// Nodes whose distance from `origin` lies in `[lower, upper]`, in id order.
    ///
    /// Includes `origin` itself when `lower` is zero.
    pub fn nodes_between_limits(&self, origin: NodeId, lower: f64, upper: f64) -> Result<Vec<NodeId>> {
        let o = self.require_node(origin)?.coord;
        Ok(self
            .nodes
            .iter()
            .filter(|n| {
                let d = Euclidean.distance(o, n.coord);
                d >= lower && d <= upper
            })
            .map(|n| n.id)
            .collect())
    }

    /// Like [`nodes_between_limits`](Self::nodes_between_limits), restricted
    /// to nodes outside the origin's region.
    pub fn nodes_between_limits_other_region(&self, origin: NodeId, lower: f64, upper: f64) -> Result<Vec<NodeId>> {
        let region = self.require_node(origin)?.region;
        let nodes = self.nodes_between_limits(origin, lower, upper)?;
        Ok(self.filter_out_region(&nodes, region))
    }

    /// `nodes` without those belonging to `region`. Unknown ids are dropped.
    pub fn filter_out_region(&self, nodes: &[NodeId], region: RegionId) -> Vec<NodeId> {
        nodes
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id.0).is_some_and(|n| n.region != region))
            .collect()
    }
}
