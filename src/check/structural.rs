//! Graph-level structural checks (G001–G005).

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::GraphIssue;
use crate::graph::Graph;

/// Run all structural checks. Returns every issue found.
pub fn check_structure(graph: &Graph) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    g001_node_ids_unique(graph, &mut issues);
    g002_edges_reference_existing_nodes(graph, &mut issues);
    g003_no_duplicate_edges(graph, &mut issues);
    g004_no_self_loops(graph, &mut issues);
    g005_no_cycles(graph, &mut issues);

    issues
}

fn g001_node_ids_unique(graph: &Graph, issues: &mut Vec<GraphIssue>) {
    let mut seen = HashSet::new();
    for (position, node) in graph.nodes.iter().enumerate() {
        if node.id.trim().is_empty() {
            issues.push(GraphIssue::error(
                "G001",
                format!("Node at position {} has no id", position + 1),
                None,
            ));
        } else if !seen.insert(node.id.as_str()) {
            issues.push(GraphIssue::error(
                "G001",
                format!("Duplicate node id '{}'", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

fn g002_edges_reference_existing_nodes(graph: &Graph, issues: &mut Vec<GraphIssue>) {
    let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        for (side, id) in [("source", &edge.source), ("target", &edge.target)] {
            if !known.contains(id.as_str()) {
                issues.push(GraphIssue::error(
                    "G002",
                    format!("Edge '{}' references unknown {side} node '{id}'", edge.id),
                    Some(id.clone()),
                ));
            }
        }
    }
}

fn g003_no_duplicate_edges(graph: &Graph, issues: &mut Vec<GraphIssue>) {
    let mut seen = HashSet::new();
    for edge in &graph.edges {
        if !seen.insert((edge.source.as_str(), edge.target.as_str())) {
            issues.push(GraphIssue::error(
                "G003",
                format!("Duplicate edge from '{}' to '{}'", edge.source, edge.target),
                Some(edge.target.clone()),
            ));
        }
    }
}

fn g004_no_self_loops(graph: &Graph, issues: &mut Vec<GraphIssue>) {
    for edge in &graph.edges {
        if edge.source == edge.target {
            issues.push(GraphIssue::error(
                "G004",
                format!("Step '{}' depends on itself", edge.source),
                Some(edge.source.clone()),
            ));
        }
    }
}

/// Multi-step cycles only; self-loops are G004. Dangling edges are skipped.
fn g005_no_cycles(graph: &Graph, issues: &mut Vec<GraphIssue>) {
    let mut dag: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        indices
            .entry(node.id.as_str())
            .or_insert_with(|| dag.add_node(node.id.as_str()));
    }
    for edge in &graph.edges {
        if let (Some(&s), Some(&t)) = (
            indices.get(edge.source.as_str()),
            indices.get(edge.target.as_str()),
        ) {
            if s != t {
                dag.update_edge(s, t, ());
            }
        }
    }

    let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&dag)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .collect();
    for scc in &mut cycles {
        scc.sort();
    }
    cycles.sort_by_key(|scc| scc[0]);

    for scc in cycles {
        let members: Vec<&str> = scc.iter().map(|&idx| dag[idx]).collect();
        issues.push(GraphIssue::error(
            "G005",
            format!("Steps {} form a circular dependency", members.join(", ")),
            members.first().map(|id| id.to_string()),
        ));
    }
}
