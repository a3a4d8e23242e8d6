//! Graph configuration: input field names and pass parameters.
//!
//! Every field has a default matching the canonical street-network export, so
//! `GraphConfig::default()` works out of the box and JSON overrides only need
//! to name what differs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

// ============================================================================
// GraphConfig
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub fields: FieldNames,
    pub space: SpaceConfig,
    pub landmarks: LandmarkConfig,
    pub sampling: SamplingConfig,
}

impl GraphConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Field names of the input attribute contract
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub segment_id: String,
    pub region: String,
    pub positive_barriers: String,
    pub negative_barriers: String,
    pub water_crossings: String,
    pub park_crossings: String,
    pub deflection: String,
    pub junction_id: String,
    pub gateway: String,
    pub building_id: String,
    pub global_score: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            segment_id: "edgeID".into(),
            region: "district".into(),
            positive_barriers: "p_barr".into(),
            negative_barriers: "n_barr".into(),
            water_crossings: "a_rivers".into(),
            park_crossings: "aw_parks".into(),
            deflection: "deg".into(),
            junction_id: "nodeID".into(),
            gateway: "gateway".into(),
            building_id: "buildingID".into(),
            global_score: "gScore_sc".into(),
        }
    }
}

// ============================================================================
// Search space around an origin/destination pair
// ============================================================================

/// `edges_within_space` radius = `max(min_radius, distance_factor × |OD|)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub min_radius: f64,
    pub distance_factor: f64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self { min_radius: 500.0, distance_factor: 1.5 }
    }
}

// ============================================================================
// Landmarks
// ============================================================================

/// How many anchors a junction keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorLimit {
    All,
    Top(usize),
}

impl AnchorLimit {
    /// Legacy sentinel meaning "all anchors".
    pub const LEGACY_ALL: usize = 999_999;

    pub fn from_count(n: usize) -> Self {
        if n == Self::LEGACY_ALL { AnchorLimit::All } else { AnchorLimit::Top(n) }
    }
}

impl<'de> Deserialize<'de> for AnchorLimit {
    /// Accepts `"All"`, `{"Top": k}`, or a bare integer (999999 = all).
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        enum Tagged {
            All,
            Top(usize),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(usize),
            Tagged(Tagged),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Count(n) => AnchorLimit::from_count(n),
            Repr::Tagged(Tagged::All) => AnchorLimit::All,
            Repr::Tagged(Tagged::Top(n)) => AnchorLimit::Top(n),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Radius for local landmarks around a junction.
    pub local_radius: f64,
    /// Radius for anchor candidates around a junction.
    pub anchor_radius: f64,
    pub anchor_limit: AnchorLimit,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self { local_radius: 50.0, anchor_radius: 2000.0, anchor_limit: AnchorLimit::Top(5) }
    }
}

// ============================================================================
// Bounded-retry node sampling
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Radius multiplier per expansion step.
    pub expansion_factor: f64,
    /// Give up once the radius reaches `cutoff × initial radius`.
    pub expansion_cutoff: f64,
    /// Tolerance added per step when sampling by distance.
    pub tolerance_step: f64,
    /// Sampled distances below this are raised to it.
    pub min_distance: f64,
    /// Maximum number of tolerance expansions before giving up.
    pub max_tolerance_steps: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            expansion_factor: 1.10,
            expansion_cutoff: 2.0,
            tolerance_step: 50.0,
            min_distance: 100.0,
            max_tolerance_steps: 40,
        }
    }
}
