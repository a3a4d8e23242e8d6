//! Random node sampling with bounded retries.
//!
//! Used to pick origins and destinations for simulated walks. Each sampler
//! owns its random source, one per caller thread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::SamplingConfig;
use crate::graph::Graph;
use crate::model::NodeId;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct NodeSampler<R> {
    rng: R,
    config: SamplingConfig,
}

impl NodeSampler<StdRng> {
    /// A reproducible sampler.
    pub fn seeded(seed: u64, config: SamplingConfig) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), config }
    }
}

impl<R: Rng> NodeSampler<R> {
    pub fn new(rng: R, config: SamplingConfig) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// A uniformly chosen element of `candidates`.
    pub fn pick(&mut self, candidates: &[NodeId]) -> Option<NodeId> {
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[self.rng.random_range(0..candidates.len())])
        }
    }

    /// Any node of `graph`.
    pub fn random_node(&mut self, graph: &Graph) -> Option<NodeId> {
        let n = graph.node_count();
        (n > 0).then(|| NodeId(self.rng.random_range(0..n)))
    }

    /// A node outside the origin's region within `radius`, widening the
    /// radius by the expansion factor until it reaches the cutoff.
    pub fn random_node_other_region(&mut self, graph: &Graph, origin: NodeId, radius: f64) -> Result<Option<NodeId>> {
        let SamplingConfig { expansion_factor, expansion_cutoff, .. } = self.config;
        if expansion_factor.is_nan() || expansion_factor <= 1.0 {
            return Err(Error::InvalidArgument(format!("expansion factor must exceed 1, got {expansion_factor}")));
        }
        let limit = radius * expansion_cutoff;
        let mut current = radius;
        while current < limit {
            let candidates = graph.nodes_between_limits_other_region(origin, 0.0, current)?;
            if let Some(node) = self.pick(&candidates) {
                return Ok(Some(node));
            }
            trace!(%origin, radius = current, "no node in another region; widening");
            current *= expansion_factor;
        }
        Ok(None)
    }

    /// A node whose distance from `origin` lies in `[lower, upper]`.
    pub fn random_node_between_limits(&mut self, graph: &Graph, origin: NodeId, lower: f64, upper: f64) -> Result<Option<NodeId>> {
        let candidates = graph.nodes_between_limits(origin, lower, upper)?;
        Ok(self.pick(&candidates))
    }

    /// Like [`random_node_between_limits`](Self::random_node_between_limits),
    /// outside the origin's region.
    pub fn random_node_between_limits_other_region(
        &mut self,
        graph: &Graph,
        origin: NodeId,
        lower: f64,
        upper: f64,
    ) -> Result<Option<NodeId>> {
        let candidates = graph.nodes_between_limits_other_region(origin, lower, upper)?;
        Ok(self.pick(&candidates))
    }

    /// A node at roughly one of `distances` from `origin`.
    ///
    /// One distance is drawn (raised to the configured minimum), then nodes
    /// within `distance ± tolerance` are searched, the tolerance growing by
    /// one step per attempt. Never yields `origin` or one of its neighbours.
    /// Requires adjacency.
    pub fn random_node_from_distances(&mut self, graph: &Graph, origin: NodeId, distances: &[f64]) -> Result<Option<NodeId>> {
        if distances.is_empty() {
            return Ok(None);
        }
        let drawn = distances[self.rng.random_range(0..distances.len())];
        let target = drawn.max(self.config.min_distance);

        let neighbours = graph.node(origin).ok_or(Error::NodeNotFound(origin))?.adjacent_nodes()?;
        let mut tolerance = self.config.tolerance_step;
        for _ in 0..self.config.max_tolerance_steps {
            let candidates: Vec<NodeId> = graph
                .nodes_between_limits(origin, target - tolerance, target + tolerance)?
                .into_iter()
                .filter(|&n| n != origin && !neighbours.contains(&n))
                .collect();
            if let Some(node) = self.pick(&candidates) {
                return Ok(Some(node));
            }
            tolerance += self.config.tolerance_step;
        }
        trace!(%origin, target, "no node found at sampled distance");
        Ok(None)
    }
}
