//! Landmark assignment: local buildings, anchors, visibility, sight lines.

use geo::Coord;
use hashbrown::HashMap;
use tracing::{debug, trace};

use super::Graph;
use crate::config::AnchorLimit;
use crate::geometry::distance_to_geometry;
use crate::layer::VectorLayer;
use crate::model::{Anchor, AttributeMapExt, Building, BuildingId, Feature, NodeLandmarks};
use crate::{Error, Result};

/// Precomputed visibility: junction id → buildings visible from it.
pub type VisibilityTable = HashMap<i64, Vec<BuildingId>>;

/// Inputs of [`Graph::assign_landmarks`]. Any source may be left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkSources<'a> {
    /// Buildings considered as local landmarks.
    pub local: Option<&'a VectorLayer>,
    /// Buildings carrying a global landmarkness score, for anchors.
    pub global: Option<&'a VectorLayer>,
    /// Sight-line features carrying a junction id and a building id.
    pub sight_lines: &'a [Feature],
    pub visibility: Option<&'a VisibilityTable>,
}

/// Counts reported by [`Graph::assign_landmarks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandmarkSummary {
    pub local: usize,
    pub anchors: usize,
    pub distant: usize,
    pub unmatched_sight_lines: usize,
}

impl Graph {
    /// Replace every node's landmark data from the given sources.
    ///
    /// All landmark data is computed before any node is updated, so an error
    /// leaves the previous assignment in place.
    pub fn assign_landmarks(&mut self, sources: &LandmarkSources<'_>) -> Result<LandmarkSummary> {
        let fields = &self.config.fields;
        let mut summary = LandmarkSummary::default();

        let mut assigned: Vec<NodeLandmarks> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let landmarks = self.landmarks_at(node.coord, node.junction_id, sources)?;
            summary.local += landmarks.local.len();
            summary.anchors += landmarks.anchors.len();
            assigned.push(landmarks);
        }

        for (idx, line) in sources.sight_lines.iter().enumerate() {
            let junction = line.attributes.get_int(&fields.junction_id)?;
            let building = BuildingId(line.attributes.get_int(&fields.building_id)?);
            let Some(node) = self.node_by_junction(junction) else {
                trace!(feature = idx, junction, "sight line names an unknown junction");
                summary.unmatched_sight_lines += 1;
                continue;
            };
            let distant = &mut assigned[node.0].distant;
            if !distant.contains(&building) {
                distant.push(building);
                summary.distant += 1;
            }
        }

        for (node, landmarks) in self.nodes.iter_mut().zip(assigned) {
            node.landmarks = landmarks;
        }
        debug!(
            graph = %self.id,
            local = summary.local,
            anchors = summary.anchors,
            distant = summary.distant,
            unmatched = summary.unmatched_sight_lines,
            "landmarks assigned"
        );
        Ok(summary)
    }

    fn landmarks_at(
        &self,
        coord: Coord<f64>,
        junction_id: Option<i64>,
        sources: &LandmarkSources<'_>,
    ) -> Result<NodeLandmarks> {
        let params = self.config.landmarks;
        let fields = &self.config.fields;
        let mut landmarks = NodeLandmarks::default();

        if let Some(layer) = sources.local {
            for idx in layer.features_within_distance(coord, params.local_radius) {
                let feature = &layer.features()[idx];
                landmarks.local.push(BuildingId(feature.attributes.get_int(&fields.building_id)?));
            }
        }

        if let Some(layer) = sources.global {
            let mut candidates = Vec::new();
            for idx in layer.features_within_distance(coord, params.anchor_radius) {
                let feature = &layer.features()[idx];
                let building = Building::from_feature(feature, &fields.building_id, &fields.global_score)?;
                let score = building
                    .global_score
                    .ok_or_else(|| Error::MissingAttribute { name: fields.global_score.clone() })?;
                let distance = distance_to_geometry(coord, &feature.geometry);
                candidates.push((score, Anchor { building: building.id, distance }));
            }
            candidates.sort_by(|(sa, a), (sb, b)| {
                sb.total_cmp(sa)
                    .then(a.distance.total_cmp(&b.distance))
                    .then(a.building.cmp(&b.building))
            });
            if let AnchorLimit::Top(k) = params.anchor_limit {
                candidates.truncate(k);
            }
            landmarks.anchors = candidates.into_iter().map(|(_, a)| a).collect();
        }

        if let Some(table) = sources.visibility {
            let visible = junction_id.and_then(|j| table.get(&j)).cloned().unwrap_or_default();
            landmarks.visible = Some(visible);
        }
        Ok(landmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::model::{AttributeMap, NodeId};
    use geo::polygon;

    fn graph(config: GraphConfig) -> Graph {
        let mut g = Graph::with_config(config);
        g.build(&[Feature::line([(0.0, 0.0), (1000.0, 0.0)], AttributeMap::new()).with_attribute("edgeID", 1)])
            .unwrap();
        g.annotate_junctions(&[
            Feature::point(0.0, 0.0, AttributeMap::new()).with_attribute("nodeID", 7),
            Feature::point(1000.0, 0.0, AttributeMap::new()).with_attribute("nodeID", 8),
        ])
        .unwrap();
        g
    }

    fn building(x: f64, y: f64, id: i64, score: f64) -> Feature {
        let footprint = polygon![(x: x, y: y), (x: x + 10.0, y: y), (x: x + 10.0, y: y + 10.0), (x: x, y: y + 10.0), (x: x, y: y)];
        Feature::new(footprint.into(), AttributeMap::new())
            .with_attribute("buildingID", id)
            .with_attribute("gScore_sc", score)
    }

    #[test]
    fn test_local_and_anchor_ranking() {
        let mut cfg = GraphConfig::default();
        cfg.landmarks.anchor_limit = AnchorLimit::Top(2);
        let mut g = graph(cfg);

        let layer = VectorLayer::from_features(vec![
            building(20.0, 0.0, 1, 0.2),
            building(300.0, 0.0, 2, 0.9),
            building(600.0, 0.0, 3, 0.5),
        ]);
        let sources = LandmarkSources { local: Some(&layer), global: Some(&layer), ..Default::default() };
        g.assign_landmarks(&sources).unwrap();

        let at_origin = &g.node(NodeId(0)).unwrap().landmarks;
        assert_eq!(at_origin.local, vec![BuildingId(1)]);
        let anchors: Vec<BuildingId> = at_origin.anchor_ids().collect();
        assert_eq!(anchors, vec![BuildingId(2), BuildingId(3)]);
        assert_eq!(at_origin.distances().collect::<Vec<_>>(), vec![300.0, 600.0]);
        assert_eq!(at_origin.visible, None);
    }

    #[test]
    fn test_fewer_candidates_than_limit() {
        let mut g = graph(GraphConfig::default());
        let layer = VectorLayer::from_features(vec![building(20.0, 0.0, 1, 0.2)]);
        let sources = LandmarkSources { global: Some(&layer), ..Default::default() };
        g.assign_landmarks(&sources).unwrap();
        assert_eq!(g.node(NodeId(0)).unwrap().landmarks.anchors.len(), 1);
    }

    #[test]
    fn test_sight_lines_and_visibility() {
        let mut g = graph(GraphConfig::default());
        let sight = vec![
            Feature::line([(0.0, 0.0), (0.0, 500.0)], AttributeMap::new())
                .with_attribute("nodeID", 8)
                .with_attribute("buildingID", 40),
            Feature::line([(0.0, 0.0), (0.0, 500.0)], AttributeMap::new())
                .with_attribute("nodeID", 99)
                .with_attribute("buildingID", 41),
        ];
        let mut table = VisibilityTable::new();
        table.insert(7, vec![BuildingId(5)]);
        let sources = LandmarkSources { sight_lines: &sight, visibility: Some(&table), ..Default::default() };
        let summary = g.assign_landmarks(&sources).unwrap();

        assert_eq!(summary.distant, 1);
        assert_eq!(summary.unmatched_sight_lines, 1);
        assert_eq!(g.node(NodeId(1)).unwrap().landmarks.distant, vec![BuildingId(40)]);
        assert_eq!(g.node(NodeId(0)).unwrap().landmarks.visible, Some(vec![BuildingId(5)]));
        assert_eq!(g.node(NodeId(1)).unwrap().landmarks.visible, Some(vec![]));
    }

    #[test]
    fn test_missing_score_is_error() {
        let mut g = graph(GraphConfig::default());
        let unscored = Feature::point(5.0, 5.0, AttributeMap::new()).with_attribute("buildingID", 3);
        let layer = VectorLayer::from_features(vec![unscored]);
        let sources = LandmarkSources { global: Some(&layer), ..Default::default() };
        assert!(matches!(g.assign_landmarks(&sources), Err(Error::MissingAttribute { .. })));
    }

    #[test]
    fn test_failed_assignment_keeps_previous_landmarks() {
        let mut g = graph(GraphConfig::default());
        let first = VectorLayer::from_features(vec![building(20.0, 0.0, 1, 0.2)]);
        g.assign_landmarks(&LandmarkSources { local: Some(&first), ..Default::default() }).unwrap();

        // the west junction decodes fine, the east one hits an unnamed building
        let second = VectorLayer::from_features(vec![
            building(20.0, 0.0, 2, 0.2),
            Feature::point(1000.0, 5.0, AttributeMap::new()),
        ]);
        let result = g.assign_landmarks(&LandmarkSources { local: Some(&second), ..Default::default() });
        assert!(matches!(result, Err(Error::MissingAttribute { .. })));
        assert_eq!(g.node(NodeId(0)).unwrap().landmarks.local, vec![BuildingId(1)]);
        assert!(g.node(NodeId(1)).unwrap().landmarks.local.is_empty());
    }
}
