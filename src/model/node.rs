//! Node (street junction, or street segment in a dual graph).

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{DirectedEdgeId, EdgeId, NodeLandmarks};
use crate::{Error, Result};

/// Arena index of a node within its owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Region (district) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub i64);

impl RegionId {
    /// Sentinel: no region. On edges it marks an inter-region bridge.
    pub const NONE: RegionId = RegionId(999_999);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() { write!(f, "none") } else { write!(f, "{}", self.0) }
    }
}

/// Back-reference from a dual node to the primal segment it stands for.
///
/// `u`/`v` are the segment's endpoints in the primal graph, cached so the
/// dual-node heuristic can reject U-turns without consulting the primal graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimalEdgeRef {
    pub edge: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
}

impl PrimalEdgeRef {
    pub fn has_endpoint(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }
}

/// Adjacency cache computed by `Graph::compute_adjacency`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    /// Distinct incident edges.
    pub edges: SmallVec<[EdgeId; 4]>,
    /// Opposite endpoint of each entry in `edges`, index-aligned.
    pub nodes: SmallVec<[NodeId; 4]>,
    /// Directed edges leaving this node.
    pub out_edges: SmallVec<[DirectedEdgeId; 4]>,
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord<f64>,
    /// External junction id (`nodeID`), set by junction annotation.
    pub junction_id: Option<i64>,
    pub region: RegionId,
    pub gateway: bool,
    /// Raw centrality, set externally before ranking.
    pub centrality: f64,
    /// Min-max rescaled centrality in `[0, 1]`.
    pub centrality_sc: f64,
    pub landmarks: NodeLandmarks,
    /// Only set on nodes of a dual graph.
    pub primal_edge: Option<PrimalEdgeRef>,
    pub(crate) adjacency: Option<Adjacency>,
}

impl Node {
    pub fn new(id: NodeId, coord: Coord<f64>) -> Self {
        Self {
            id,
            coord,
            junction_id: None,
            region: RegionId::NONE,
            gateway: false,
            centrality: 0.0,
            centrality_sc: 0.0,
            landmarks: NodeLandmarks::default(),
            primal_edge: None,
            adjacency: None,
        }
    }

    pub fn point(&self) -> Point<f64> {
        Point::from(self.coord)
    }

    pub fn is_dual(&self) -> bool {
        self.primal_edge.is_some()
    }

    pub fn adjacency(&self) -> Result<&Adjacency> {
        self.adjacency.as_ref().ok_or(Error::AdjacencyNotComputed { node: self.id })
    }

    /// Incident edges.
    pub fn edges(&self) -> Result<&[EdgeId]> {
        Ok(&self.adjacency()?.edges)
    }

    pub fn adjacent_nodes(&self) -> Result<&[NodeId]> {
        Ok(&self.adjacency()?.nodes)
    }

    pub fn out_edges(&self) -> Result<&[DirectedEdgeId]> {
        Ok(&self.adjacency()?.out_edges)
    }

    pub fn degree(&self) -> Result<usize> {
        Ok(self.adjacency()?.edges.len())
    }
}
