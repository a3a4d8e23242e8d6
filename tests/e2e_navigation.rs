//! End-to-end tests for the primal/dual pair and dual-node selection.
//!
//! Each test builds a lattice, derives its dual from segment centroids, links
//! the two, and then drives the navigation heuristics.

use std::thread;

use geo::Coord;
use urban_graph::angles::{angular_difference, bearing};
use urban_graph::{
    AttributeMap, DualRequest, EdgeId, Error, Feature, Graph, NodeId, RouteCriterion, SegmentId, Subgraph,
};

/// A 3 × 3 lattice with 100 m blocks. Row 0 (y = 0) is region 1, everything
/// else region 2, and the vertical streets between rows 0 and 1 are bridges.
fn lattice() -> Graph {
    let mut lines = Vec::new();
    let mut id = 0i64;
    for i in 0..3 {
        for j in 0..2 {
            let (a, b) = (i as f64 * 100.0, j as f64 * 100.0);
            let vertical = Feature::line([(a, b), (a, b + 100.0)], AttributeMap::new()).with_attribute("edgeID", id);
            lines.push(if j == 0 { vertical } else { vertical.with_attribute("district", 2) });
            let region = if i == 0 { 1 } else { 2 };
            lines.push(
                Feature::line([(b, a), (b + 100.0, a)], AttributeMap::new())
                    .with_attribute("edgeID", id + 1)
                    .with_attribute("district", region),
            );
            id += 2;
        }
    }
    let mut graph = Graph::new();
    graph.build(&lines).unwrap();
    graph.compute_adjacency();

    let junctions: Vec<Feature> = graph
        .nodes()
        .iter()
        .map(|n| {
            let region = if n.coord.y == 0.0 { 1 } else { 2 };
            Feature::point(n.coord.x, n.coord.y, AttributeMap::new())
                .with_attribute("nodeID", n.id.0 as i64)
                .with_attribute("district", region)
        })
        .collect();
    graph.annotate_junctions(&junctions).unwrap();
    graph
}

fn centroid(graph: &Graph, edge: EdgeId) -> (f64, f64) {
    let p = graph.edge(edge).unwrap().centroid().unwrap();
    (p.x(), p.y())
}

/// Dual graph: one node per segment centroid, one edge per pair of segments
/// meeting at a junction, carrying the deflection angle.
fn dual_of(primal: &Graph) -> (Graph, Vec<Feature>) {
    let mut lines = Vec::new();
    for node in primal.nodes() {
        let incident = node.edges().unwrap();
        for (i, &a) in incident.iter().enumerate() {
            for &b in &incident[i + 1..] {
                let (ca, cb) = (centroid(primal, a), centroid(primal, b));
                let at = node.coord;
                let ba = bearing(Coord { x: ca.0, y: ca.1 }, at);
                let bb = bearing(at, Coord { x: cb.0, y: cb.1 });
                lines.push(
                    Feature::line([ca, cb], AttributeMap::new())
                        .with_attribute("edgeID", lines.len() as i64)
                        .with_attribute("deg", angular_difference(ba, bb)),
                );
            }
        }
    }
    let centroids = primal
        .edges()
        .iter()
        .map(|e| {
            let (x, y) = centroid(primal, e.id);
            Feature::point(x, y, AttributeMap::new()).with_attribute("edgeID", e.segment_id.0)
        })
        .collect();

    let mut dual = Graph::new();
    dual.build(&lines).unwrap();
    dual.compute_adjacency();
    (dual, centroids)
}

fn linked() -> (Graph, Graph) {
    let mut primal = lattice();
    let (mut dual, centroids) = dual_of(&primal);
    let linked = primal.link_dual(&mut dual, &centroids).unwrap();
    assert_eq!(linked, primal.edge_count());
    (primal, dual)
}

fn at(graph: &Graph, x: f64, y: f64) -> NodeId {
    graph.find_node(Coord { x, y }).unwrap()
}

/// Junction C at the origin with a street east to A that continues over a
/// bridge to B, and a street north through D to the cul-de-sac E.
fn spur() -> (Graph, Graph) {
    let street = |id: i64, a: (f64, f64), b: (f64, f64)| {
        Feature::line([a, b], AttributeMap::new()).with_attribute("edgeID", id)
    };
    let mut primal = Graph::new();
    primal
        .build(&[
            street(0, (0.0, 0.0), (100.0, 0.0)).with_attribute("district", 1),
            street(1, (100.0, 0.0), (200.0, 0.0)),
            street(2, (0.0, 0.0), (0.0, 100.0)).with_attribute("district", 1),
            street(3, (0.0, 100.0), (0.0, 200.0)).with_attribute("district", 1),
        ])
        .unwrap();
    primal.compute_adjacency();
    let (mut dual, centroids) = dual_of(&primal);
    primal.link_dual(&mut dual, &centroids).unwrap();
    (primal, dual)
}

// ============================================================================
// 1. Linking
// ============================================================================

#[test]
fn test_dual_links_every_segment() {
    let (primal, dual) = linked();
    assert_eq!(dual.node_count(), primal.edge_count());
    for edge in primal.edges() {
        let d = edge.dual_node.unwrap();
        let back = dual.node(d).unwrap().primal_edge.unwrap();
        assert_eq!(back.edge, edge.id);
        assert_eq!((back.u, back.v), (edge.u, edge.v));
    }
    // straight continuations carry no deflection, corners carry 90°
    let degs: Vec<f64> = dual.edges().iter().filter_map(|e| e.deflection).collect();
    assert!(degs.iter().all(|&d| d.abs() < 1e-9 || (d - 90.0).abs() < 1e-9));
}

// ============================================================================
// 2. Greedy selection
// ============================================================================

#[test]
fn test_selection_heads_for_destination() {
    let (primal, dual) = linked();
    let origin = at(&primal, 100.0, 100.0);
    let destination = at(&primal, 200.0, 100.0);
    let request = DualRequest { origin, destination, region_based: false, previous_junction: None };

    let best = primal.select_dual_node(origin, &request, &dual).unwrap();
    let edge = primal.edge(best.edge).unwrap();
    assert!(edge.has_endpoint(destination));
    assert_eq!(best.cost, 0.0);
    assert_eq!(Some(best.dual_node), edge.dual_node);

    let ranked = primal.select_dual_nodes(origin, &request, &dual).unwrap();
    assert_eq!(ranked.len(), 4);
    assert_eq!(ranked[0], best);
}

#[test]
fn test_previous_junction_is_never_returned() {
    let (primal, dual) = linked();
    let destination = at(&primal, 200.0, 200.0);
    let origin = at(&primal, 0.0, 0.0);
    for node in primal.nodes() {
        for &previous in node.adjacent_nodes().unwrap() {
            let request = DualRequest { origin, destination, region_based: false, previous_junction: Some(previous) };
            for candidate in primal.select_dual_nodes(node.id, &request, &dual).unwrap() {
                let primal_ref = dual.node(candidate.dual_node).unwrap().primal_edge.unwrap();
                assert!(!primal_ref.has_endpoint(previous));
            }
        }
    }
}

#[test]
fn test_region_based_avoids_bridges() {
    let (primal, dual) = linked();
    // heading south from the middle of region 2 towards region 1
    let origin = at(&primal, 100.0, 100.0);
    let destination = at(&primal, 100.0, 0.0);
    let request = DualRequest { origin, destination, region_based: true, previous_junction: None };

    let candidates = primal.select_dual_nodes(origin, &request, &dual).unwrap();
    assert_eq!(candidates.len(), 3);
    for c in &candidates {
        assert!(!primal.edge(c.edge).unwrap().is_bridge());
    }

    let free = DualRequest { region_based: false, ..request };
    let best = primal.select_dual_node(origin, &free, &dual).unwrap();
    assert!(primal.edge(best.edge).unwrap().is_bridge());
}

#[test]
fn test_region_based_drops_segment_into_bridge_only_junction() {
    let (primal, dual) = spur();
    let (c, a, d, e) = (at(&primal, 0.0, 0.0), at(&primal, 100.0, 0.0), at(&primal, 0.0, 100.0), at(&primal, 0.0, 200.0));
    let towards_a = primal.edge_with(c, a).unwrap().unwrap();
    let towards_d = primal.edge_with(c, d).unwrap().unwrap();

    // leaving C: A can only be left over the bridge
    let leaving = DualRequest { origin: c, destination: e, region_based: true, previous_junction: None };
    let candidates = primal.select_dual_nodes(c, &leaving, &dual).unwrap();
    assert_eq!(candidates.iter().map(|c| c.edge).collect::<Vec<_>>(), vec![towards_d]);

    // arriving at C: nothing is stranded any more
    let arriving = DualRequest { origin: e, destination: c, region_based: true, previous_junction: None };
    let candidates = primal.select_dual_nodes(c, &arriving, &dual).unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().any(|c| c.edge == towards_a));
}

#[test]
fn test_region_based_keeps_cul_de_sac() {
    let (primal, dual) = spur();
    let (c, d, e) = (at(&primal, 0.0, 0.0), at(&primal, 0.0, 100.0), at(&primal, 0.0, 200.0));
    let request = DualRequest { origin: c, destination: at(&primal, 200.0, 0.0), region_based: true, previous_junction: None };
    let candidates = primal.select_dual_nodes(d, &request, &dual).unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().any(|c| c.edge == primal.edge_with(d, e).unwrap().unwrap()));
}

#[test]
fn test_subgraph_selection_excludes_previous_junction() {
    let (primal, dual) = linked();
    let (centre, south, east) = (at(&primal, 100.0, 100.0), at(&primal, 100.0, 0.0), at(&primal, 200.0, 100.0));
    let south_edge = primal.edge_with(centre, south).unwrap().unwrap();
    let east_edge = primal.edge_with(centre, east).unwrap().unwrap();
    let sub = Subgraph::new(&primal, &[south_edge, east_edge]).unwrap();

    let child = |n: NodeId| sub.child_node(n).unwrap();
    let request = DualRequest {
        origin: child(south),
        destination: child(east),
        region_based: false,
        previous_junction: Some(child(south)),
    };
    let candidates = sub.graph().select_dual_nodes(child(centre), &request, &dual).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(sub.parent_edge(candidates[0].edge), Some(east_edge));
    let primal_ref = dual.node(candidates[0].dual_node).unwrap().primal_edge.unwrap();
    assert!(!primal_ref.has_endpoint(south));

    let free = DualRequest { previous_junction: None, ..request };
    assert_eq!(sub.graph().select_dual_nodes(child(centre), &free, &dual).unwrap().len(), 2);
}

#[test]
fn test_no_candidate_without_dual() {
    let primal = lattice();
    let dual = Graph::new();
    let origin = at(&primal, 0.0, 0.0);
    let request = DualRequest { origin, destination: at(&primal, 200.0, 200.0), region_based: false, previous_junction: None };
    assert!(matches!(
        primal.select_dual_node(origin, &request, &dual),
        Err(Error::NoDualCandidate { .. })
    ));
}

// ============================================================================
// 3. Dual paths feed back into selection
// ============================================================================

#[test]
fn test_previous_junction_from_dual_path() {
    let (primal, dual) = linked();
    let first = primal.edge_by_segment(SegmentId(1)).unwrap();
    let second = primal.edge_with(at(&primal, 100.0, 0.0), at(&primal, 200.0, 0.0)).unwrap().unwrap();
    let path = [
        primal.edge(first).unwrap().dual_node.unwrap(),
        primal.edge(second).unwrap().dual_node.unwrap(),
    ];
    assert_eq!(dual.previous_junction(&path).unwrap(), Some(at(&primal, 100.0, 0.0)));
    assert_eq!(dual.primal_edges(&path).unwrap(), vec![first, second]);
}

// ============================================================================
// 4. Sealed graphs are shared read-only across threads
// ============================================================================

#[test]
fn test_sealed_concurrent_reads() {
    let (primal, dual) = linked();
    let primal = primal.seal();
    let dual = dual.seal();
    let origin = at(&primal, 0.0, 0.0);
    let destination = at(&primal, 200.0, 200.0);

    thread::scope(|s| {
        for _ in 0..4 {
            let primal = primal.clone();
            let dual = dual.clone();
            s.spawn(move || {
                let request = DualRequest { origin, destination, region_based: false, previous_junction: None };
                for node in primal.nodes() {
                    let best = primal.select_dual_node(node.id, &request, &dual).unwrap();
                    primal.edge(best.edge).unwrap().densities.record(RouteCriterion::RoadDistance);
                }
            });
        }
    });

    let total: u32 = primal.edges().iter().map(|e| e.densities.get(RouteCriterion::RoadDistance)).sum();
    assert_eq!(total as usize, 4 * primal.node_count());
    primal.reset_densities();
    assert!(primal.edges().iter().all(|e| e.densities.total() == 0));
}
