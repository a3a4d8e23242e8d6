//! Primal ↔ dual linkage and dual-path helpers.
//!
//! In the dual graph every node stands for a primal segment. The link is kept
//! on both sides: `Edge::dual_node` in the primal graph, `Node::primal_edge`
//! in the dual graph.

use tracing::{debug, trace, warn};

use super::Graph;
use crate::model::{AttributeMapExt, EdgeId, Feature, NodeId, PrimalEdgeRef, SegmentId};
use crate::{Error, Result};

impl Graph {
    /// Link this primal graph to its dual through a centroid point layer.
    ///
    /// Each centroid carries the segment id of the primal edge it represents
    /// and sits exactly on a node of `dual`. Centroids that match nothing on
    /// either side are skipped. Returns the number of links made.
    pub fn link_dual(&mut self, dual: &mut Graph, centroids: &[Feature]) -> Result<usize> {
        let mut linked = 0;
        for (idx, feature) in centroids.iter().enumerate() {
            let Some(point) = feature.as_point() else {
                trace!(feature = idx, "skipping non-point centroid");
                continue;
            };
            let segment = SegmentId(feature.attributes.get_int(&self.config.fields.segment_id)?);
            let Some(dual_id) = dual.find_node(point.0) else {
                warn!(%segment, "centroid matches no dual node");
                continue;
            };
            let Some(edge_id) = self.edge_by_segment(segment) else {
                warn!(%segment, "centroid names an unknown segment");
                continue;
            };

            let edge = self.edge_mut(edge_id)?;
            edge.dual_node = Some(dual_id);
            let primal = PrimalEdgeRef { edge: edge_id, u: edge.u, v: edge.v };
            dual.node_mut(dual_id)?.primal_edge = Some(primal);
            linked += 1;
        }
        debug!(primal = %self.id, dual = %dual.id, linked, total = centroids.len(), "dual linked");
        Ok(linked)
    }

    fn primal_ref(&self, dual_node: NodeId) -> Result<PrimalEdgeRef> {
        self.require_node(dual_node)?
            .primal_edge
            .ok_or(Error::NotADualNode { node: dual_node })
    }

    /// The primal junction shared by the segments behind two dual nodes.
    ///
    /// Called on the dual graph. `None` when the segments do not touch.
    pub fn common_primal_junction(&self, a: NodeId, b: NodeId) -> Result<Option<NodeId>> {
        let pa = self.primal_ref(a)?;
        let pb = self.primal_ref(b)?;
        Ok(if pb.has_endpoint(pa.u) {
            Some(pa.u)
        } else if pb.has_endpoint(pa.v) {
            Some(pa.v)
        } else {
            None
        })
    }

    /// The primal junction between the last two segments of a dual path.
    ///
    /// Called on the dual graph. `None` for paths shorter than two nodes.
    pub fn previous_junction(&self, path: &[NodeId]) -> Result<Option<NodeId>> {
        match path {
            [.., a, b] => self.common_primal_junction(*a, *b),
            _ => Ok(None),
        }
    }

    /// The primal edges behind a sequence of dual nodes.
    pub fn primal_edges(&self, path: &[NodeId]) -> Result<Vec<EdgeId>> {
        path.iter().map(|&n| self.primal_ref(n).map(|p| p.edge)).collect()
    }
}
