//! Dual-node selection and neighbourhood queries used to seed route search.

use geo::{Distance, Euclidean};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Graph;
use crate::model::{DirectedEdgeId, EdgeId, NodeId, RegionId};
use crate::{Error, Result};

/// Parameters of a dual-node lookup at one primal junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualRequest {
    pub origin: NodeId,
    pub destination: NodeId,
    /// Skip bridges and segments that lead into a bridge-only dead end.
    pub region_based: bool,
    /// Junction the walker just came from; segments touching it are skipped.
    ///
    /// Like the other ids here it belongs to the graph being queried. Inside
    /// a subgraph, map a junction from `Graph::previous_junction` through
    /// `Subgraph::child_node` first.
    pub previous_junction: Option<NodeId>,
}

/// A qualifying dual node and its heuristic cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualCandidate {
    /// Node in the dual graph.
    pub dual_node: NodeId,
    /// The primal edge it stands for.
    pub edge: EdgeId,
    /// Distance from the segment's far endpoint to the target.
    pub cost: f64,
}

/// A neighbouring region reachable from a gateway, and the junction entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub region: RegionId,
    pub entry: NodeId,
}

impl Graph {
    /// The best dual node to start (or end) a route at `node`.
    ///
    /// Among the segments incident to `node`, the one whose far endpoint is
    /// closest to the destination wins; at the destination itself the
    /// comparison is against the origin instead. Ties go to the first
    /// incident segment.
    ///
    /// `dual` is the dual graph linked to this graph, or to its parent when
    /// this graph belongs to a [`Subgraph`](super::Subgraph).
    pub fn select_dual_node(&self, node: NodeId, request: &DualRequest, dual: &Graph) -> Result<DualCandidate> {
        let mut best: Option<DualCandidate> = None;
        for candidate in self.dual_candidates(node, request, dual)? {
            if best.is_none_or(|b| candidate.cost < b.cost) {
                best = Some(candidate);
            }
        }
        best.ok_or(Error::NoDualCandidate { node })
    }

    /// Every qualifying dual node at `node`, cheapest first.
    pub fn select_dual_nodes(&self, node: NodeId, request: &DualRequest, dual: &Graph) -> Result<Vec<DualCandidate>> {
        let mut candidates = self.dual_candidates(node, request, dual)?;
        candidates.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        Ok(candidates)
    }

    fn dual_candidates(&self, node: NodeId, request: &DualRequest, dual: &Graph) -> Result<Vec<DualCandidate>> {
        let here = self.require_node(node)?;
        let origin = self.require_node(request.origin)?.coord;
        let destination = self.require_node(request.destination)?.coord;
        let at_destination = node == request.destination;
        let target = if at_destination { origin } else { destination };
        let previous = request.previous_junction.map(|p| self.primal_frame_node(p)).transpose()?;

        let adj = here.adjacency()?;
        let mut candidates = Vec::with_capacity(adj.edges.len());
        for (&edge_id, &far) in adj.edges.iter().zip(adj.nodes.iter()) {
            let edge = self.require_edge(edge_id)?;
            if request.region_based && edge.is_bridge() {
                trace!(%node, edge = %edge_id, "skipping bridge");
                continue;
            }
            let Some(dual_id) = edge.dual_node else {
                trace!(%node, edge = %edge_id, "segment has no dual node");
                continue;
            };
            let primal = dual
                .require_node(dual_id)?
                .primal_edge
                .ok_or(Error::NotADualNode { node: dual_id })?;
            if let Some(previous) = previous {
                if primal.has_endpoint(previous) {
                    trace!(%node, edge = %edge_id, "skipping U-turn");
                    continue;
                }
            }
            if request.region_based && !at_destination && self.is_bridge_dead_end(far, edge_id)? {
                trace!(%node, edge = %edge_id, "skipping segment into bridge-only junction");
                continue;
            }

            let far_coord = self.require_node(far)?.coord;
            candidates.push(DualCandidate { dual_node: dual_id, edge: edge_id, cost: Euclidean.distance(far_coord, target) });
        }
        Ok(candidates)
    }

    /// Whether `junction` can only be left again over bridges.
    ///
    /// Needs at least one other segment: a cul-de-sac inside a region is not
    /// a region boundary.
    fn is_bridge_dead_end(&self, junction: NodeId, via: EdgeId) -> Result<bool> {
        let mut others = 0;
        for &edge_id in self.require_node(junction)?.edges()? {
            if edge_id == via {
                continue;
            }
            if !self.require_edge(edge_id)?.is_bridge() {
                return Ok(false);
            }
            others += 1;
        }
        Ok(others > 0)
    }

    /// Regions adjacent to a gateway junction.
    ///
    /// `None` when `node` is not a gateway. Otherwise one entry per neighbour
    /// lying in a different region, in adjacency order.
    pub fn adjacent_regions(&self, node: NodeId) -> Result<Option<Vec<RegionEntry>>> {
        let here = self.require_node(node)?;
        if !here.gateway {
            return Ok(None);
        }
        let mut entries = Vec::new();
        for &other in here.adjacent_nodes()? {
            let region = self.require_node(other)?.region;
            if region != here.region {
                entries.push(RegionEntry { region, entry: other });
            }
        }
        Ok(Some(entries))
    }

    /// The first edge joining `a` and `b`, if any.
    pub fn edge_with(&self, a: NodeId, b: NodeId) -> Result<Option<EdgeId>> {
        Ok(self.edges_between(self.require_node(a)?, b)?.first().copied())
    }

    /// The directed edge leaving `a` towards `b`, if any.
    pub fn directed_edge_with(&self, a: NodeId, b: NodeId) -> Result<Option<DirectedEdgeId>> {
        Ok(self
            .require_node(a)?
            .out_edges()?
            .iter()
            .copied()
            .find(|id| self.directed.get(id.0).is_some_and(|de| de.to == b)))
    }
}
