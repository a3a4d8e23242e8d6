//! Landmark metadata attached to junctions.

use serde::{Deserialize, Serialize};

use super::{AttributeMapExt, Feature};
use crate::Result;

/// Building identifier as carried by the buildings layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub i64);

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A building that may act as a landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub land_use: Option<String>,
    /// Rescaled global landmarkness score, if the layer carries one.
    pub global_score: Option<f64>,
}

impl Building {
    pub fn from_feature(feature: &Feature, id_field: &str, score_field: &str) -> Result<Self> {
        Ok(Self {
            id: BuildingId(feature.attributes.get_int(id_field)?),
            land_use: feature.attributes.find_str("land_use")?.map(str::to_string),
            global_score: feature.attributes.find_float(score_field)?,
        })
    }
}

/// An anchoring landmark and its distance from the junction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub building: BuildingId,
    pub distance: f64,
}

/// Landmarks of one junction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLandmarks {
    /// Buildings visible from the junction; `None` when no visibility table
    /// was supplied.
    pub visible: Option<Vec<BuildingId>>,
    pub local: Vec<BuildingId>,
    pub distant: Vec<BuildingId>,
    /// Anchors, highest global score first.
    pub anchors: Vec<Anchor>,
}

impl NodeLandmarks {
    pub fn anchor_ids(&self) -> impl Iterator<Item = BuildingId> + '_ {
        self.anchors.iter().map(|a| a.building)
    }

    /// Anchor distances, index-aligned with [`anchor_ids`](Self::anchor_ids).
    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.anchors.iter().map(|a| a.distance)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.as_ref().is_none_or(|v| v.is_empty())
            && self.local.is_empty()
            && self.distant.is_empty()
            && self.anchors.is_empty()
    }
}
