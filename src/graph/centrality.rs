//! Centrality ranking and salient-node selection.

use geo::{Coord, Distance, Euclidean};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Graph;
use crate::geometry::midpoint;
use crate::model::NodeId;
use crate::{Error, Result};

/// A ranked node and its raw centrality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalientNode {
    pub node: NodeId,
    pub centrality: f64,
}

/// Spatial restriction for [`Graph::salient_nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpatialScope {
    /// Closed disc on the midpoint of `origin`–`destination`, radius half
    /// their distance. Both endpoints lie on its boundary.
    EnclosingCircle { origin: NodeId, destination: NodeId },
    /// Closed disc around `center`.
    Disc { center: NodeId, radius: f64 },
    /// Nodes whose distance from `center` lies in `[inner, outer]`.
    Annulus { center: NodeId, inner: f64, outer: f64 },
}

/// Which population the percentile boundary of a scoped salience query is
/// taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SalienceBoundary {
    /// The scoped population itself.
    #[default]
    Local,
    /// The whole network's ranking, applied to the scoped population.
    Global,
}

/// A scope resolved to coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ring {
    center: Coord<f64>,
    inner: f64,
    outer: f64,
}

impl Ring {
    pub(crate) fn contains(&self, c: Coord<f64>) -> bool {
        let d = Euclidean.distance(self.center, c);
        d >= self.inner && d <= self.outer
    }
}

impl SpatialScope {
    pub(crate) fn resolve(&self, graph: &Graph) -> Result<Ring> {
        Ok(match *self {
            SpatialScope::EnclosingCircle { origin, destination } => {
                let o = graph.require_node(origin)?.coord;
                let d = graph.require_node(destination)?.coord;
                // the midpoint rounds, so widen by an ulp-scale epsilon to keep O and D inside
                let radius = Euclidean.distance(o, d) / 2.0;
                Ring { center: midpoint(o, d), inner: 0.0, outer: radius * (1.0 + 1e-12) + 1e-9 }
            }
            SpatialScope::Disc { center, radius } => {
                Ring { center: graph.require_node(center)?.coord, inner: 0.0, outer: radius }
            }
            SpatialScope::Annulus { center, inner, outer } => {
                Ring { center: graph.require_node(center)?.coord, inner, outer }
            }
        })
    }
}

impl Graph {
    /// Set the externally computed raw centrality of one node.
    pub fn set_centrality(&mut self, node: NodeId, score: f64) -> Result<()> {
        if !score.is_finite() {
            return Err(Error::InvalidArgument(format!("centrality of node {node} is not finite: {score}")));
        }
        self.node_mut(node)?.centrality = score;
        Ok(())
    }

    /// Sort nodes ascending by raw centrality and rescale it to `[0, 1]`.
    ///
    /// Ties keep node-id order. When every score is identical the rescaled
    /// value is `0.0` for all nodes.
    pub fn rank_centrality(&mut self) -> Result<()> {
        self.install_ranking();
        let Some(ranking) = self.ranking.as_ref() else { return Ok(()) };
        let (Some(first), Some(last)) = (ranking.first(), ranking.last()) else {
            return Ok(());
        };
        let (min, max) = (first.centrality, last.centrality);
        if !(min.is_finite() && max.is_finite()) {
            return Err(Error::InvalidArgument("centrality scores must be finite".into()));
        }

        let range = max - min;
        if range == 0.0 && self.nodes.len() > 1 {
            warn!(graph = %self.id, score = min, "all centrality scores identical; rescaled to 0");
        }
        for node in &mut self.nodes {
            node.centrality_sc = if range > 0.0 { (node.centrality - min) / range } else { 0.0 };
        }
        debug!(graph = %self.id, nodes = self.nodes.len(), min, max, "centrality ranked");
        Ok(())
    }

    /// Rebuild the ascending ranking from the current raw scores without
    /// touching the rescaled values.
    pub(crate) fn install_ranking(&mut self) {
        let mut ranking: Vec<SalientNode> = self
            .nodes
            .iter()
            .map(|n| SalientNode { node: n.id, centrality: n.centrality })
            .collect();
        ranking.sort_by(|a, b| a.centrality.total_cmp(&b.centrality).then(a.node.cmp(&b.node)));
        self.ranking = Some(ranking);
    }

    /// The ascending centrality ranking.
    pub fn ranking(&self) -> Result<&[SalientNode]> {
        self.ranking.as_deref().ok_or(Error::CentralityNotRanked)
    }

    /// Nodes at or above the `percentile` centrality boundary, ascending.
    ///
    /// The boundary is the score at position `floor(N × percentile)` of the
    /// (optionally scoped) ascending ranking, clamped to the last position.
    /// An empty scope yields an empty list.
    pub fn salient_nodes(&self, percentile: f64, scope: Option<&SpatialScope>) -> Result<Vec<SalientNode>> {
        self.salient_nodes_with(percentile, scope, SalienceBoundary::Local)
    }

    /// Like [`salient_nodes`](Self::salient_nodes), with the boundary taken
    /// from the population `boundary` names.
    pub fn salient_nodes_with(
        &self,
        percentile: f64,
        scope: Option<&SpatialScope>,
        boundary: SalienceBoundary,
    ) -> Result<Vec<SalientNode>> {
        if !(0.0..=1.0).contains(&percentile) {
            return Err(Error::InvalidPercentile(percentile));
        }
        let ranking = self.ranking()?;

        let population: Vec<SalientNode> = match scope {
            None => ranking.to_vec(),
            Some(scope) => {
                let ring = scope.resolve(self)?;
                ranking
                    .iter()
                    .filter(|s| self.nodes.get(s.node.0).is_some_and(|n| ring.contains(n.coord)))
                    .copied()
                    .collect()
            }
        };
        if population.is_empty() {
            return Ok(Vec::new());
        }

        let basis = match boundary {
            SalienceBoundary::Local => population.as_slice(),
            SalienceBoundary::Global => ranking,
        };
        let Some(min) = percentile_boundary(basis, percentile) else {
            return Ok(Vec::new());
        };
        Ok(population.into_iter().filter(|s| s.centrality >= min).collect())
    }
}

/// Score at position `floor(N × percentile)` of an ascending ranking, clamped
/// to the last entry.
fn percentile_boundary(ranking: &[SalientNode], percentile: f64) -> Option<f64> {
    let last = ranking.len().checked_sub(1)?;
    let position = ((ranking.len() as f64 * percentile).floor() as usize).min(last);
    Some(ranking[position].centrality)
}
