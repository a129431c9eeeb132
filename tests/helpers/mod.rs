#![allow(dead_code)]

use actions_compiler::graph::{Edge, Graph, Node, Position, StepData};

// =============================================================================
// Graph builders
// =============================================================================

pub fn at(x: f64, y: f64) -> Position {
    Position { x, y }
}

pub fn shell(id: &str, y: f64, command: &str) -> Node {
    Node::new(id, at(0.0, y), StepData::shell(command).named(id))
}

pub fn action(id: &str, y: f64, repository: &str) -> Node {
    Node::new(id, at(0.0, y), StepData::action(repository).named(id))
}

pub fn edge(source: &str, target: &str) -> Edge {
    Edge::new(format!("e-{source}-{target}"), source, target)
}

/// Nodes named by `ids`, laid out top to bottom, with the given edges.
pub fn graph(ids: &[&str], edges: &[(&str, &str)]) -> Graph {
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(i, id)| shell(id, i as f64 * 100.0, &format!("echo {id}")))
        .collect();
    let edges = edges.iter().map(|(s, t)| edge(s, t)).collect();
    Graph::new(nodes, edges)
}

/// A single chain `ids[0] → ids[1] → ...`.
pub fn chain(ids: &[&str]) -> Graph {
    let pairs: Vec<(&str, &str)> = ids.windows(2).map(|w| (w[0], w[1])).collect();
    graph(ids, &pairs)
}

/// `(source, target)` pairs of a graph's edges.
pub fn edge_pairs(graph: &Graph) -> Vec<(String, String)> {
    graph
        .edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect()
}
