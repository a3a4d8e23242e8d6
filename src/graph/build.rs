//! Construction passes: lines → topology, adjacency caches, junction data.

use geo::{Coord, Geometry, LineString};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::Graph;
use crate::geometry::CoordKey;
use crate::model::*;
use crate::Result;

/// Outcome of [`Graph::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Lines that became edges.
    pub edges: usize,
    /// Features skipped because their geometry is not a single line.
    pub not_a_line: usize,
    /// Lines skipped because fewer than two distinct points remained.
    pub degenerate: usize,
}

/// A line feature decoded and ready for insertion.
struct PendingSegment {
    line: LineString<f64>,
    segment_id: SegmentId,
    region: RegionId,
    deflection: Option<f64>,
    barriers: Barriers,
    attributes: AttributeMap,
}

impl Graph {
    /// Create one edge per line feature, merging endpoints by coordinate.
    ///
    /// Repeated consecutive points are removed first. Non-line geometries and
    /// lines that collapse to a single point are skipped. Barrier fields are
    /// decoded here and dropped from the attribute bag.
    ///
    /// Every feature is decoded before anything is inserted, so an error
    /// leaves the graph untouched. On success the adjacency caches and the
    /// centrality ranking are cleared.
    pub fn build(&mut self, features: &[Feature]) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();
        let mut pending = Vec::with_capacity(features.len());

        for (idx, feature) in features.iter().enumerate() {
            let Geometry::LineString(raw) = &feature.geometry else {
                trace!(feature = idx, "skipping non-line geometry");
                summary.not_a_line += 1;
                continue;
            };

            let mut coords: Vec<Coord<f64>> = raw.0.clone();
            coords.dedup_by(|a, b| CoordKey::new(*a) == CoordKey::new(*b));
            if coords.len() < 2 {
                trace!(feature = idx, "skipping degenerate line");
                summary.degenerate += 1;
                continue;
            }
            pending.push(self.decode_segment(feature, coords)?);
        }

        for segment in pending {
            let id = self.insert_edge(segment.line, segment.segment_id, segment.region);
            let edge = &mut self.edges[id.0];
            edge.deflection = segment.deflection;
            edge.barriers = segment.barriers;
            edge.attributes = segment.attributes;
            summary.edges += 1;
        }

        for node in &mut self.nodes {
            node.adjacency = None;
        }
        self.adjacency_ready = false;
        self.ranking = None;
        debug!(
            graph = %self.id,
            edges = summary.edges,
            not_a_line = summary.not_a_line,
            degenerate = summary.degenerate,
            nodes = self.nodes.len(),
            "graph built"
        );
        Ok(summary)
    }

    fn decode_segment(&self, feature: &Feature, coords: Vec<Coord<f64>>) -> Result<PendingSegment> {
        let fields = &self.config.fields;
        let segment_id = SegmentId(feature.attributes.get_int(&fields.segment_id)?);
        let region = feature
            .attributes
            .find_int(&fields.region)?
            .map_or(RegionId::NONE, RegionId);
        let deflection = feature.attributes.find_float(&fields.deflection)?;
        let mut attributes = feature.attributes.clone();
        let barriers = Barriers::take_from(&mut attributes, fields)?;
        Ok(PendingSegment { line: LineString::new(coords), segment_id, region, deflection, barriers, attributes })
    }

    /// The node at `coord`, created if absent. The flag is `true` on creation.
    pub(crate) fn get_or_create_node(&mut self, coord: Coord<f64>) -> (NodeId, bool) {
        let key = CoordKey::new(coord);
        if let Some(&id) = self.coord_index.get(&key) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, coord));
        self.coord_index.insert(key, id);
        (id, true)
    }

    /// Append an edge over `line` plus its two directed edges.
    pub(crate) fn insert_edge(&mut self, line: LineString<f64>, segment_id: SegmentId, region: RegionId) -> EdgeId {
        let n = line.0.len();
        let (first, second) = (line.0[0], line.0[1]);
        let (last, before_last) = (line.0[n - 1], line.0[n - 2]);

        let (u, _) = self.get_or_create_node(first);
        let (v, _) = self.get_or_create_node(last);

        let id = EdgeId(self.edges.len());
        let forward = DirectedEdgeId(self.directed.len());
        let backward = DirectedEdgeId(forward.0 + 1);
        self.directed.push(DirectedEdge {
            id: forward,
            edge: id,
            from: u,
            to: v,
            direction_pt: (second.x, second.y),
            along_line: true,
        });
        self.directed.push(DirectedEdge {
            id: backward,
            edge: id,
            from: v,
            to: u,
            direction_pt: (before_last.x, before_last.y),
            along_line: false,
        });

        if let Some(existing) = self.segment_index.insert(segment_id, id) {
            warn!(segment = %segment_id, first = %existing, "duplicate segment id; index now points at the later edge");
        }

        self.edges.push(Edge {
            id,
            segment_id,
            region,
            line,
            u,
            v,
            dual_node: None,
            deflection: None,
            barriers: Barriers::default(),
            attributes: AttributeMap::new(),
            directed: [forward, backward],
            densities: RouteDensities::new(),
        });
        id
    }

    /// Fill every node's adjacency cache from the directed edges.
    pub fn compute_adjacency(&mut self) {
        for node in &mut self.nodes {
            node.adjacency = Some(Adjacency::default());
        }
        for de in &self.directed {
            let Some(adj) = self.nodes[de.from.0].adjacency.as_mut() else { continue };
            adj.out_edges.push(de.id);
            if !adj.edges.contains(&de.edge) {
                adj.edges.push(de.edge);
                adj.nodes.push(de.to);
            }
        }
        self.adjacency_ready = true;

        let isolated = self
            .nodes
            .iter()
            .filter(|n| n.adjacency.as_ref().is_some_and(|a| a.edges.is_empty()))
            .count();
        debug!(graph = %self.id, nodes = self.nodes.len(), isolated, "adjacency computed");
    }

    /// Attach junction ids, regions and gateway flags from a point layer.
    ///
    /// Points are matched to nodes by exact coordinate; unmatched points are
    /// skipped. Returns the number of nodes annotated.
    pub fn annotate_junctions(&mut self, junctions: &[Feature]) -> Result<usize> {
        let mut matched = 0;
        for (idx, feature) in junctions.iter().enumerate() {
            let Some(point) = feature.as_point() else {
                trace!(feature = idx, "skipping non-point junction");
                continue;
            };
            let Some(id) = self.find_node(point.0) else {
                trace!(feature = idx, x = point.x(), y = point.y(), "junction matches no node");
                continue;
            };

            let fields = &self.config.fields;
            let junction_id = feature.attributes.find_int(&fields.junction_id)?;
            let region = feature.attributes.find_int(&fields.region)?;
            let gateway = feature.attributes.find_bool(&fields.gateway)?;

            let node = &mut self.nodes[id.0];
            if let Some(jid) = junction_id {
                node.junction_id = Some(jid);
                self.junction_index.insert(jid, id);
            }
            if let Some(region) = region {
                node.region = RegionId(region);
            }
            node.gateway = gateway.unwrap_or(false);
            matched += 1;
        }
        debug!(graph = %self.id, matched, total = junctions.len(), "junctions annotated");
        Ok(matched)
    }

    /// Incident edges of `node` whose far endpoint is `other`.
    pub(crate) fn edges_between(&self, node: &Node, other: NodeId) -> Result<SmallVec<[EdgeId; 2]>> {
        let adj = node.adjacency()?;
        Ok(adj
            .edges
            .iter()
            .zip(adj.nodes.iter())
            .filter(|&(_, &n)| n == other)
            .map(|(&e, _)| e)
            .collect())
    }
}
