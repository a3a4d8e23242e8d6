//! Per-edge route density counters.
//!
//! Written by the routing layer (outside this crate) each time a route of a
//! given kind traverses the edge. Atomic so they remain writable on a sealed,
//! shared graph.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// The route-choice criterion a counted route was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteCriterion {
    RoadDistance,
    AngularChange,
    Topological,
    RoadDistanceLandmarks,
    AngularChangeLandmarks,
    LocalLandmarks,
    GlobalLandmarks,
    RoadDistanceRegions,
    AngularChangeRegions,
    RoadDistanceBarriers,
    AngularChangeBarriers,
    RoadDistanceRegionsBarriers,
    AngularChangeRegionsBarriers,
}

impl RouteCriterion {
    pub const ALL: [RouteCriterion; 13] = [
        RouteCriterion::RoadDistance,
        RouteCriterion::AngularChange,
        RouteCriterion::Topological,
        RouteCriterion::RoadDistanceLandmarks,
        RouteCriterion::AngularChangeLandmarks,
        RouteCriterion::LocalLandmarks,
        RouteCriterion::GlobalLandmarks,
        RouteCriterion::RoadDistanceRegions,
        RouteCriterion::AngularChangeRegions,
        RouteCriterion::RoadDistanceBarriers,
        RouteCriterion::AngularChangeBarriers,
        RouteCriterion::RoadDistanceRegionsBarriers,
        RouteCriterion::AngularChangeRegionsBarriers,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Write-only traversal counters, one per [`RouteCriterion`].
#[derive(Default)]
pub struct RouteDensities {
    counts: [AtomicU32; 13],
}

impl RouteDensities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, criterion: RouteCriterion) {
        self.counts[criterion.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, criterion: RouteCriterion) -> u32 {
        self.counts[criterion.index()].load(Ordering::Relaxed)
    }

    /// Zero every counter. Called between independent simulation batches.
    pub fn reset(&self) {
        for c in &self.counts {
            c.store(0, Ordering::Relaxed);
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed) as u64).sum()
    }
}

impl Clone for RouteDensities {
    fn clone(&self) -> Self {
        let out = Self::default();
        for (dst, src) in out.counts.iter().zip(self.counts.iter()) {
            dst.store(src.load(Ordering::Relaxed), Ordering::Relaxed);
        }
        out
    }
}

impl fmt::Debug for RouteDensities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for criterion in RouteCriterion::ALL {
            let n = self.get(criterion);
            if n > 0 {
                map.entry(&criterion, &n);
            }
        }
        map.finish()
    }
}
