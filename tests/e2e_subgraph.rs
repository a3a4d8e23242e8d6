//! End-to-end tests for regional subgraphs and their parent mappings.

use pretty_assertions::assert_eq;
use urban_graph::{
    AttributeMap, BuildingId, EdgeId, Error, Feature, Graph, LandmarkSources, NodeId, RegionId, Subgraph,
    VectorLayer,
};

/// Two 2 × 3 districts side by side (x < 200 is region 1, x ≥ 200 region 2),
/// joined by bridge segments along x = 100 → 200.
fn city() -> Graph {
    let mut lines = Vec::new();
    let mut id = 0i64;
    let mut street = |a: (f64, f64), b: (f64, f64), region: Option<i64>| {
        let f = Feature::line([a, b], AttributeMap::new())
            .with_attribute("edgeID", id)
            .with_attribute("p_barr", format!("[{}]", id % 3));
        id += 1;
        lines.push(match region {
            Some(r) => f.with_attribute("district", r),
            None => f,
        });
    };
    for y in [0.0, 100.0, 200.0] {
        street((0.0, y), (100.0, y), Some(1));
        street((100.0, y), (200.0, y), None);
        street((200.0, y), (300.0, y), Some(2));
    }
    for x in [0.0, 100.0, 200.0, 300.0] {
        let region = if x < 200.0 { 1 } else { 2 };
        street((x, 0.0), (x, 100.0), Some(region));
        street((x, 100.0), (x, 200.0), Some(region));
    }

    let mut graph = Graph::new();
    graph.build(&lines).unwrap();
    graph.compute_adjacency();
    for i in 0..graph.node_count() {
        graph.set_centrality(NodeId(i), (i * 3 % 7) as f64).unwrap();
    }
    graph.rank_centrality().unwrap();
    graph
}

// ============================================================================
// 1. Mappings
// ============================================================================

#[test]
fn test_parent_maps_land_inside_selection() {
    let parent = city();
    let selection: Vec<EdgeId> = parent.edges().iter().filter(|e| e.region == RegionId(1)).map(|e| e.id).collect();
    let sub = Subgraph::new(&parent, &selection).unwrap();

    assert_eq!(sub.graph().edge_count(), selection.len());
    for child in sub.graph().edges() {
        let p = sub.parent_edge(child.id).unwrap();
        assert!(selection.contains(&p));
        assert_eq!(sub.child_edge(p), Some(child.id));
        // endpoints map onto the parent edge's endpoints
        let (pu, pv) = (sub.parent_node(child.u).unwrap(), sub.parent_node(child.v).unwrap());
        let parent_edge = parent.edge(p).unwrap();
        assert_eq!((pu, pv), (parent_edge.u, parent_edge.v));
    }
    for child in sub.graph().nodes() {
        let p = sub.parent_node(child.id).unwrap();
        assert!(selection.iter().any(|&e| parent.edge(e).unwrap().has_endpoint(p)));
        assert_eq!(parent.node(p).unwrap().coord, child.coord);
    }
}

#[test]
fn test_for_region_excludes_bridges() {
    let parent = city();
    let sub = Subgraph::for_region(&parent, RegionId(2)).unwrap();
    assert!(sub.graph().edges().iter().all(|e| e.region == RegionId(2)));
    assert_eq!(sub.graph().edge_count(), 7);
    assert_eq!(sub.graph().node_count(), 6);

    let parents: Vec<EdgeId> = sub.parent_edges(&(0..7).map(EdgeId).collect::<Vec<_>>());
    assert_eq!(sub.child_edges(&parents).len(), 7);
}

#[test]
fn test_within_space() {
    let parent = city();
    let o = parent.find_node(geo::Coord { x: 0.0, y: 0.0 }).unwrap();
    let d = parent.find_node(geo::Coord { x: 300.0, y: 200.0 }).unwrap();
    // the default 500 m floor covers the whole city
    let sub = Subgraph::within_space(&parent, o, d).unwrap();
    assert_eq!(sub.graph().edge_count(), parent.edge_count());
}

// ============================================================================
// 2. Centrality is always parent-derived
// ============================================================================

#[test]
fn test_salient_nodes_in_parent_identity() {
    let parent = city();
    let mut sub = Subgraph::for_region(&parent, RegionId(1)).unwrap();
    assert!(matches!(sub.salient_nodes(0.5, None), Err(Error::CentralityNotRanked)));
    sub.rank_centrality(&parent).unwrap();

    let salient = sub.salient_nodes(0.0, None).unwrap();
    assert_eq!(salient.len(), sub.graph().node_count());
    for s in &salient {
        let child = sub.child_node(s.node).unwrap();
        assert_eq!(parent.node(s.node).unwrap().centrality, s.centrality);
        assert_eq!(sub.graph().node(child).unwrap().centrality_sc, parent.node(s.node).unwrap().centrality_sc);
    }

    for s in sub.global_salient_nodes(&parent, 0.5).unwrap() {
        assert!(sub.child_node(s.node).is_some());
    }
}

#[test]
fn test_parent_check() {
    let parent = city();
    let stranger = city();
    let mut sub = Subgraph::for_region(&parent, RegionId(1)).unwrap();
    assert!(matches!(sub.union_barriers(&stranger), Err(Error::ParentMismatch { .. })));
    assert!(matches!(sub.global_salient_nodes(&stranger, 0.1), Err(Error::ParentMismatch { .. })));
}

// ============================================================================
// 3. Barriers and landmarks
// ============================================================================

#[test]
fn test_barrier_union_is_deduplicated() {
    let parent = city();
    let mut sub = Subgraph::for_region(&parent, RegionId(1)).unwrap();
    let mut union = sub.union_barriers(&parent).unwrap().to_vec();
    union.sort();
    assert_eq!(union, vec![0, 1, 2]);
}

#[test]
fn test_landmarks_copied_from_parent() {
    let mut parent = city();
    let buildings = VectorLayer::from_features(vec![
        Feature::point(10.0, 10.0, AttributeMap::new()).with_attribute("buildingID", 1),
    ]);
    parent
        .assign_landmarks(&LandmarkSources { local: Some(&buildings), ..Default::default() })
        .unwrap();

    let mut sub = Subgraph::for_region(&parent, RegionId(1)).unwrap();
    sub.copy_landmarks_from_parent(&parent).unwrap();
    let origin = parent.find_node(geo::Coord { x: 0.0, y: 0.0 }).unwrap();
    let child = sub.child_node(origin).unwrap();
    assert_eq!(sub.graph().node(child).unwrap().landmarks.local, vec![BuildingId(1)]);
    assert_eq!(sub.graph().node(child).unwrap().landmarks, parent.node(origin).unwrap().landmarks);
}

#[test]
fn test_sealed_subgraph() {
    let parent = city();
    let sub = Subgraph::for_region(&parent, RegionId(2)).unwrap().seal();
    let copy = sub.clone();
    assert_eq!(copy.parent_id(), parent.id());
    assert_eq!(copy.graph().edge_count(), sub.graph().edge_count());
}
