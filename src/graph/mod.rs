//! # Graph
//!
//! A `Graph` owns every node, edge and directed edge of one street network
//! (primal) or of its dual. Entities live in arenas and refer to each other by
//! id; the coordinate index guarantees one node per distinct coordinate, which
//! is what merges input lines into a connected topology.
//!
//! ## Lifecycle
//!
//! ```text
//! Graph::new()
//!   → build(features)              one edge per accepted line
//!   → compute_adjacency()          per-node incidence caches
//!   → annotate_junctions(points)   junction ids, regions, gateways
//!   → set_centrality(..)           externally computed scores
//!   → rank_centrality()            ascending ranking + [0, 1] rescale
//!   → assign_landmarks(sources)
//!   → seal()                       read-only, shareable handle
//! ```
//!
//! Every pass takes `&mut self`; a [`Sealed`] handle only hands out `&Graph`,
//! so no pass can run once the graph is shared.

mod build;
mod centrality;
mod spatial;
mod landmarks;
mod navigation;
mod dual;
mod subgraph;

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use geo::Coord;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::geometry::CoordKey;
use crate::model::*;
use crate::{Error, Result};

pub use build::BuildSummary;
pub use centrality::{SalienceBoundary, SalientNode, SpatialScope};
pub use landmarks::{LandmarkSources, LandmarkSummary, VisibilityTable};
pub use navigation::{DualCandidate, DualRequest, RegionEntry};
pub use subgraph::Subgraph;

// ============================================================================
// GraphId
// ============================================================================

/// Process-unique graph identity, used to check subgraph/parent pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub u64);

impl GraphId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        GraphId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    config: GraphConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    directed: Vec<DirectedEdge>,
    /// coordinate → node (one node per distinct coordinate)
    coord_index: HashMap<CoordKey, NodeId>,
    /// input segment id → edge
    segment_index: HashMap<SegmentId, EdgeId>,
    /// external junction id → node
    junction_index: HashMap<i64, NodeId>,
    /// Ascending by centrality; `None` until ranked.
    ranking: Option<Vec<SalientNode>>,
    adjacency_ready: bool,
    /// Parent node of each node when this graph was induced from another.
    /// Dual back-references keep pointing into the parent's id space.
    parent_frame: Option<Vec<NodeId>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            id: GraphId::next(),
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            directed: Vec::new(),
            coord_index: HashMap::new(),
            segment_index: HashMap::new(),
            junction_index: HashMap::new(),
            ranking: None,
            adjacency_ready: false,
            parent_frame: None,
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ========================================================================
    // Entity access
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn directed_edge(&self, id: DirectedEdgeId) -> Option<&DirectedEdge> {
        self.directed.get(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn directed_edges(&self) -> &[DirectedEdge] {
        &self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_adjacency_ready(&self) -> bool {
        self.adjacency_ready
    }

    // ========================================================================
    // Lookups (a miss is `None`, never an error)
    // ========================================================================

    pub fn find_node(&self, coord: Coord<f64>) -> Option<NodeId> {
        self.coord_index.get(&CoordKey::new(coord)).copied()
    }

    pub fn edge_by_segment(&self, segment: SegmentId) -> Option<EdgeId> {
        self.segment_index.get(&segment).copied()
    }

    pub fn node_by_junction(&self, junction_id: i64) -> Option<NodeId> {
        self.junction_index.get(&junction_id).copied()
    }

    pub(crate) fn require_node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn require_edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges.get(id.0).ok_or(Error::EdgeNotFound(id))
    }

    /// `id` as seen by `PrimalEdgeRef`s: the parent node for an induced
    /// graph, `id` itself otherwise.
    pub(crate) fn primal_frame_node(&self, id: NodeId) -> Result<NodeId> {
        match &self.parent_frame {
            Some(parents) => parents.get(id.0).copied().ok_or(Error::NodeNotFound(id)),
            None => Ok(id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
        self.edges.get_mut(id.0).ok_or(Error::EdgeNotFound(id))
    }

    /// Zero the route density counters of every edge.
    pub fn reset_densities(&self) {
        for edge in &self.edges {
            edge.reset_densities();
        }
    }

    /// Freeze the graph into a shareable read-only handle.
    pub fn seal(self) -> Sealed<Graph> {
        tracing::debug!(graph = %self.id, nodes = self.nodes.len(), edges = self.edges.len(), "graph sealed");
        Sealed::new(self)
    }
}

// ============================================================================
// Sealed
// ============================================================================

/// Read-only, cheaply cloneable handle to a finished graph or subgraph.
///
/// Only `&T` is reachable through it, so none of the mutating passes can run.
/// Route density counters stay writable because they are atomic.
#[derive(Debug)]
pub struct Sealed<T>(Arc<T>);

impl<T> Sealed<T> {
    fn new(inner: T) -> Self {
        Sealed(Arc::new(inner))
    }

    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T> Clone for Sealed<T> {
    fn clone(&self) -> Self {
        Sealed(Arc::clone(&self.0))
    }
}

impl<T> Deref for Sealed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Sealed<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}
