use clusterbridge_core::{ClusterId, DeassignConfig, GraphNode};
use clusterbridge_graph::{
    deassign_clusters, ClusterGraph, DeassignClusters, DeassignReport, MIN_NONTRIVIAL_NODES,
};
use std::collections::BTreeMap;

fn node(name: &str, op: &str, cluster: Option<i32>) -> GraphNode {
    let node = GraphNode::new(name, op);
    match cluster {
        Some(id) => node.with_cluster(id),
        None => node,
    }
}

/// Scenarios 1-4 plus an unclustered node, in one graph.
fn mixed_graph() -> ClusterGraph {
    let mut graph = ClusterGraph::new();
    for n in [
        node("A", "Const", Some(0)),
        node("B", "Identity", Some(0)),
        node("C", "MatMul", Some(1)),
        node("D", "Const", Some(1)),
        node("E", "MatMul", Some(2)),
        node("F", "Add", Some(2)),
        node("G", "MatMul", Some(3)),
        node("H", "Add", Some(3)),
        node("I", "Const", Some(3)),
        node("Z", "Relu", None),
    ] {
        graph.add_node(n).unwrap();
    }
    graph.add_edge("A", "C").unwrap();
    graph.add_edge("E", "F").unwrap();
    graph.add_edge("F", "Z").unwrap();
    graph
}

fn assignments(graph: &ClusterGraph) -> BTreeMap<String, Option<ClusterId>> {
    graph
        .nodes()
        .map(|n| (n.name.clone(), n.cluster_id()))
        .collect()
}

#[test]
fn test_trivial_clusters_are_busted() {
    let mut graph = mixed_graph();
    let report = deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();

    assert!(!report.bypassed);
    assert_eq!(report.busted_ids(), vec![ClusterId(0), ClusterId(1)]);
    assert_eq!(report.surviving, vec![ClusterId(2), ClusterId(3)]);
    assert_eq!(report.busted_node_count(), 4);

    for name in ["A", "B", "C", "D"] {
        assert!(!graph.node_by_name(name).unwrap().is_clustered(), "{name} kept its cluster");
    }
    for (name, id) in [("E", 2), ("F", 2), ("G", 3), ("H", 3), ("I", 3)] {
        assert_eq!(graph.node_by_name(name).unwrap().cluster_id(), Some(ClusterId(id)));
    }
}

#[test]
fn test_unclustered_node_untouched_and_unreported() {
    let mut graph = mixed_graph();
    let before = graph.node_by_name("Z").unwrap().clone();
    let report = deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();

    assert_eq!(graph.node_by_name("Z").unwrap(), &before);
    assert!(report
        .busted
        .iter()
        .all(|c| !c.nodes.iter().any(|n| n == "Z")));
}

#[test]
fn test_bypass_leaves_graph_identical() {
    let mut graph = mixed_graph();
    let before = graph.to_json_string_pretty().unwrap();

    let report = deassign_clusters(&mut graph, &DeassignConfig::disabled()).unwrap();
    assert!(report.bypassed);
    assert!(report.busted.is_empty() && report.surviving.is_empty());
    assert_eq!(graph.to_json_string_pretty().unwrap(), before);
    assert_eq!(graph.node_by_name("A").unwrap().cluster_id(), Some(ClusterId(0)));
}

#[test]
fn test_edges_and_unrelated_attributes_preserved() {
    let mut graph = ClusterGraph::new();
    graph
        .add_node(node("k", "Const", Some(4)).with_attribute("value", 1.5))
        .unwrap();
    graph.add_node(node("m", "MatMul", Some(4))).unwrap();
    graph.add_edge("k", "m").unwrap();

    deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();

    let k = graph.node_by_name("k").unwrap();
    assert!(!k.is_clustered());
    assert_eq!(k.attributes["value"], serde_json::json!(1.5));
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_sparse_and_negative_ids_are_not_renumbered() {
    let mut graph = ClusterGraph::new();
    for n in [
        node("p", "Add", Some(-7)),
        node("q", "Mul", Some(-7)),
        node("r", "Add", Some(1000)),
    ] {
        graph.add_node(n).unwrap();
    }

    let report = deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();
    assert_eq!(report.surviving, vec![ClusterId(-7)]);
    assert_eq!(report.busted_ids(), vec![ClusterId(1000)]);
    assert_eq!(graph.node_by_name("p").unwrap().cluster_id(), Some(ClusterId(-7)));
}

#[test]
fn test_empty_graph() {
    let mut graph = ClusterGraph::new();
    let report = deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();
    assert_eq!(report, DeassignReport::default());
}

const OPS: [&str; 6] = ["Const", "Identity", "MatMul", "Add", "Relu", "Conv2D"];

fn random_graph(seed: u64, nodes: usize, clusters: i32) -> ClusterGraph {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut graph = ClusterGraph::new();
    for i in 0..nodes {
        let op = OPS[rng.usize(..OPS.len())];
        let cluster = if rng.u8(..4) == 0 {
            None
        } else {
            Some(rng.i32(0..clusters))
        };
        graph.add_node(node(&format!("n{i}"), op, cluster)).unwrap();
    }
    graph
}

#[test]
fn test_randomized_threshold_and_disjointness() {
    for seed in 0..50 {
        let mut graph = random_graph(seed, 60, 12);
        let before = assignments(&graph);
        let clusters_before = graph.clusters();

        deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();
        let after = assignments(&graph);

        for (id, members) in &clusters_before {
            let non_trivial = members
                .iter()
                .filter(|idx| !graph.node(**idx).unwrap().op.is_trivial())
                .count();
            let survives = non_trivial >= MIN_NONTRIVIAL_NODES;
            for idx in members {
                let n = graph.node(*idx).unwrap();
                let expected = if survives { Some(*id) } else { None };
                assert_eq!(n.cluster_id(), expected, "seed {seed}, node {}", n.name);
            }
        }

        // No node gains an assignment.
        for (name, cluster) in &after {
            if cluster.is_some() {
                assert_eq!(&before[name], cluster, "seed {seed}, node {name}");
            }
        }
    }
}

#[test]
fn test_randomized_idempotence() {
    let pass = DeassignClusters::default();
    for seed in 100..130 {
        let mut graph = random_graph(seed, 40, 8);
        pass.deassign(&mut graph).unwrap();
        let once = assignments(&graph);

        let second = pass.deassign(&mut graph).unwrap();
        assert!(second.busted.is_empty(), "seed {seed}");
        assert_eq!(assignments(&graph), once);
    }
}

#[test]
fn test_randomized_pairing_preserved() {
    for seed in 200..230 {
        let mut graph = random_graph(seed, 40, 6);
        deassign_clusters(&mut graph, &DeassignConfig::default()).unwrap();
        for n in graph.nodes() {
            if let Some(assignment) = n.cluster {
                assert!(assignment.marked, "seed {seed}, node {}", n.name);
            }
        }
    }
}
