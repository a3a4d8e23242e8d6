//! # Subgraph
//!
//! An induced graph over a subset of a parent's edges that stays traceable to
//! its parent. The subgraph owns its own `Graph` (fresh ids, own adjacency)
//! plus bidirectional id maps; every operation that reads the parent checks
//! that it was handed the right one.
//!
//! Centrality and landmarks are never recomputed here: they are copied from
//! the parent, so a subgraph ranking is a restriction of the parent ranking.

use hashbrown::HashMap;
use tracing::debug;

use super::{Graph, GraphId, SalientNode, Sealed, SpatialScope};
use crate::model::{EdgeId, NodeId, RegionId};
use crate::{Error, Result};

#[derive(Debug)]
pub struct Subgraph {
    graph: Graph,
    parent_id: GraphId,
    /// child node index → parent node
    node_parents: Vec<NodeId>,
    node_children: HashMap<NodeId, NodeId>,
    /// child edge index → parent edge
    edge_parents: Vec<EdgeId>,
    edge_children: HashMap<EdgeId, EdgeId>,
    barriers: Vec<i64>,
}

impl Subgraph {
    /// Induce a subgraph from `edges` of `parent`. Repeated ids are ignored.
    ///
    /// Nodes come into existence only as endpoints of selected edges and
    /// copy the parent's junction id, region, gateway flag, dual back-reference
    /// and raw centrality. Adjacency is computed before returning.
    pub fn new(parent: &Graph, edges: &[EdgeId]) -> Result<Self> {
        let mut sub = Subgraph {
            graph: Graph::with_config(parent.config.clone()),
            parent_id: parent.id,
            node_parents: Vec::new(),
            node_children: HashMap::new(),
            edge_parents: Vec::new(),
            edge_children: HashMap::new(),
            barriers: Vec::new(),
        };

        for &parent_edge in edges {
            if sub.edge_children.contains_key(&parent_edge) {
                continue;
            }
            let source = parent.require_edge(parent_edge)?;
            for endpoint in [source.u, source.v] {
                sub.adopt_node(parent, endpoint)?;
            }

            let child = sub.graph.insert_edge(source.line.clone(), source.segment_id, source.region);
            let edge = &mut sub.graph.edges[child.0];
            edge.dual_node = source.dual_node;
            edge.deflection = source.deflection;
            edge.barriers = source.barriers.clone();
            edge.attributes = source.attributes.clone();

            sub.edge_parents.push(parent_edge);
            sub.edge_children.insert(parent_edge, child);
        }

        sub.graph.parent_frame = Some(sub.node_parents.clone());
        sub.graph.compute_adjacency();
        debug!(
            parent = %sub.parent_id,
            subgraph = %sub.graph.id,
            nodes = sub.graph.nodes.len(),
            edges = sub.graph.edges.len(),
            "subgraph induced"
        );
        Ok(sub)
    }

    fn adopt_node(&mut self, parent: &Graph, parent_node: NodeId) -> Result<()> {
        if self.node_children.contains_key(&parent_node) {
            return Ok(());
        }
        let source = parent.require_node(parent_node)?;
        let (child, _) = self.graph.get_or_create_node(source.coord);
        let node = &mut self.graph.nodes[child.0];
        node.junction_id = source.junction_id;
        node.region = source.region;
        node.gateway = source.gateway;
        node.primal_edge = source.primal_edge;
        node.centrality = source.centrality;
        node.centrality_sc = source.centrality_sc;
        if let Some(jid) = source.junction_id {
            self.graph.junction_index.insert(jid, child);
        }

        self.node_parents.push(parent_node);
        self.node_children.insert(parent_node, child);
        Ok(())
    }

    /// The subgraph of every edge belonging to `region`.
    pub fn for_region(parent: &Graph, region: RegionId) -> Result<Self> {
        let edges: Vec<EdgeId> = parent.edges.iter().filter(|e| e.region == region).map(|e| e.id).collect();
        Self::new(parent, &edges)
    }

    /// The subgraph of the origin/destination search space
    /// (see [`Graph::edges_within_space`]).
    pub fn within_space(parent: &Graph, origin: NodeId, destination: NodeId) -> Result<Self> {
        let edges = parent.edges_within_space(origin, destination)?;
        Self::new(parent, &edges)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn parent_id(&self) -> GraphId {
        self.parent_id
    }

    fn check_parent(&self, parent: &Graph) -> Result<()> {
        if parent.id == self.parent_id {
            Ok(())
        } else {
            Err(Error::ParentMismatch { expected: self.parent_id, got: parent.id })
        }
    }

    // ========================================================================
    // Parent ↔ child id maps
    // ========================================================================

    pub fn parent_node(&self, child: NodeId) -> Option<NodeId> {
        self.node_parents.get(child.0).copied()
    }

    pub fn child_node(&self, parent: NodeId) -> Option<NodeId> {
        self.node_children.get(&parent).copied()
    }

    pub fn parent_edge(&self, child: EdgeId) -> Option<EdgeId> {
        self.edge_parents.get(child.0).copied()
    }

    pub fn child_edge(&self, parent: EdgeId) -> Option<EdgeId> {
        self.edge_children.get(&parent).copied()
    }

    /// Parent ids of `children`; ids unknown to the subgraph are dropped.
    pub fn parent_nodes(&self, children: &[NodeId]) -> Vec<NodeId> {
        children.iter().filter_map(|&c| self.parent_node(c)).collect()
    }

    /// Child ids of `parents`; nodes outside the subgraph are dropped.
    pub fn child_nodes(&self, parents: &[NodeId]) -> Vec<NodeId> {
        parents.iter().filter_map(|&p| self.child_node(p)).collect()
    }

    pub fn parent_edges(&self, children: &[EdgeId]) -> Vec<EdgeId> {
        children.iter().filter_map(|&c| self.parent_edge(c)).collect()
    }

    pub fn child_edges(&self, parents: &[EdgeId]) -> Vec<EdgeId> {
        parents.iter().filter_map(|&p| self.child_edge(p)).collect()
    }

    /// Parent edges the subgraph was induced from, in child-id order.
    pub fn source_edges(&self) -> &[EdgeId] {
        &self.edge_parents
    }

    // ========================================================================
    // Data copied from the parent
    // ========================================================================

    /// Deduplicated union of the parent edges' barrier lists, first-seen order.
    ///
    /// Edge barrier data is refreshed from the parent first.
    pub fn union_barriers(&mut self, parent: &Graph) -> Result<&[i64]> {
        self.check_parent(parent)?;
        let mut union = Vec::new();
        for (child, &parent_edge) in self.edge_parents.iter().enumerate() {
            let barriers = &parent.require_edge(parent_edge)?.barriers;
            for id in &barriers.merged {
                if !union.contains(id) {
                    union.push(*id);
                }
            }
            self.graph.edges[child].barriers = barriers.clone();
        }
        self.barriers = union;
        Ok(&self.barriers)
    }

    /// The barrier union from the last [`union_barriers`](Self::union_barriers).
    pub fn barriers(&self) -> &[i64] {
        &self.barriers
    }

    /// Copy every node's landmark data from its parent node.
    pub fn copy_landmarks_from_parent(&mut self, parent: &Graph) -> Result<()> {
        self.check_parent(parent)?;
        for (child, &parent_node) in self.node_parents.iter().enumerate() {
            self.graph.nodes[child].landmarks = parent.require_node(parent_node)?.landmarks.clone();
        }
        Ok(())
    }

    // ========================================================================
    // Centrality (always parent-derived)
    // ========================================================================

    /// Copy raw and rescaled centrality from the parent and rank ascending.
    pub fn rank_centrality(&mut self, parent: &Graph) -> Result<()> {
        self.check_parent(parent)?;
        for (child, &parent_node) in self.node_parents.iter().enumerate() {
            let source = parent.require_node(parent_node)?;
            let node = &mut self.graph.nodes[child];
            node.centrality = source.centrality;
            node.centrality_sc = source.centrality_sc;
        }
        self.graph.install_ranking();
        Ok(())
    }

    /// Salient nodes of the subgraph, reported as parent ids.
    ///
    /// `scope` refers to nodes by their child ids.
    pub fn salient_nodes(&self, percentile: f64, scope: Option<&SpatialScope>) -> Result<Vec<SalientNode>> {
        let local = self.graph.salient_nodes(percentile, scope)?;
        Ok(local
            .into_iter()
            .filter_map(|s| self.parent_node(s.node).map(|node| SalientNode { node, ..s }))
            .collect())
    }

    /// The parent's salient nodes that also belong to the subgraph.
    pub fn global_salient_nodes(&self, parent: &Graph, percentile: f64) -> Result<Vec<SalientNode>> {
        self.check_parent(parent)?;
        Ok(parent
            .salient_nodes(percentile, None)?
            .into_iter()
            .filter(|s| self.node_children.contains_key(&s.node))
            .collect())
    }

    pub fn seal(self) -> Sealed<Subgraph> {
        debug!(subgraph = %self.graph.id, parent = %self.parent_id, "subgraph sealed");
        Sealed::new(self)
    }
}
