//! # urban-graph: Street Network Substrate for Pedestrian Route Choice
//!
//! Turns street-segment line features into a topologically connected planar
//! graph, links it to its dual representation (segments become nodes), ranks
//! junctions by centrality, attaches landmark and barrier metadata, and carves
//! out regional subgraphs that stay traceable to their parent.
//!
//! ## Design Principles
//!
//! 1. **Arena-owned topology**: a `Graph` owns every `Node`, `Edge` and
//!    `DirectedEdge`; all cross references are integer ids
//! 2. **Phase-ordered passes**: build → adjacency → centrality → landmarks →
//!    subgraphs, each a complete pass with `&mut self`
//! 3. **Sealed for reading**: `Graph::seal()` hands out a shareable read-only
//!    handle, so concurrent route planners can never observe a mutation
//! 4. **No routing here**: the dual-node heuristic seeds an external search,
//!    it never computes a route
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use urban_graph::{Feature, Graph, AttributeMap, AttributeValue};
//! use geo::{Geometry, LineString};
//!
//! # fn example() -> urban_graph::Result<()> {
//! let mut attrs = AttributeMap::new();
//! attrs.insert("edgeID".into(), AttributeValue::Int(1));
//! attrs.insert("district".into(), AttributeValue::Int(3));
//! let line = LineString::from(vec![(0.0, 0.0), (100.0, 0.0)]);
//! let features = vec![Feature::new(Geometry::LineString(line), attrs)];
//!
//! let mut graph = Graph::new();
//! graph.build(&features)?;
//! graph.compute_adjacency();
//! graph.rank_centrality()?;
//! let graph = graph.seal();
//!
//! assert_eq!(graph.node_count(), 2);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod angles;
pub mod geometry;
pub mod layer;
pub mod config;
pub mod graph;
pub mod lookup;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, NodeId, Edge, EdgeId, DirectedEdge, DirectedEdgeId,
    RegionId, SegmentId, BuildingId,
    AttributeValue, AttributeMap, Feature,
    Barriers, RouteDensities, RouteCriterion,
    Building, Anchor, NodeLandmarks, PrimalEdgeRef, Adjacency,
};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use graph::{
    Graph, GraphId, Sealed, Subgraph,
    SpatialScope, SalientNode, SalienceBoundary, DualRequest, DualCandidate, RegionEntry,
    LandmarkSources, LandmarkSummary, VisibilityTable, BuildSummary,
};

pub use layer::{VectorLayer, AttributeFilter};
pub use config::{GraphConfig, FieldNames, SpaceConfig, LandmarkConfig, SamplingConfig, AnchorLimit};
pub use lookup::NodeSampler;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Adjacency of node {node} requested before compute_adjacency()")]
    AdjacencyNotComputed { node: NodeId },

    #[error("Centrality ranking requested before rank_centrality()")]
    CentralityNotRanked,

    #[error("No dual candidate qualifies at node {node}")]
    NoDualCandidate { node: NodeId },

    #[error("Node {node} carries no primal-edge back-reference")]
    NotADualNode { node: NodeId },

    #[error("Missing attribute: {name}")]
    MissingAttribute { name: String },

    #[error("Attribute type error on {name}: expected {expected}, got {got}")]
    AttributeType { name: String, expected: &'static str, got: &'static str },

    #[error("Cannot decode barrier field {field}: {value:?}")]
    BarrierParse { field: String, value: String },

    #[error("Percentile must lie in [0, 1], got {0}")]
    InvalidPercentile(f64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Graph {got} is not the parent of this subgraph (expected {expected})")]
    ParentMismatch { expected: GraphId, got: GraphId },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
