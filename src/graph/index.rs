//! Dependency index: incoming/outgoing adjacency over the node/edge set.
//!
//! Rebuilt from scratch for every synthesis or analysis call. Backed by a
//! petgraph `DiGraph` for cycle discovery and reachability.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use tracing::debug;

use super::types::{Edge, Node};
use crate::error::{Phase, Result, WorkflowError};

static EMPTY: BTreeSet<String> = BTreeSet::new();

#[derive(Debug, Clone)]
pub struct DependencyIndex {
    /// Node ids in input array order.
    order: Vec<String>,
    incoming: HashMap<String, BTreeSet<String>>,
    outgoing: HashMap<String, BTreeSet<String>>,
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

/// Build the index, rejecting empty/duplicate node ids and dangling edges.
pub fn build_index(nodes: &[Node], edges: &[Edge]) -> Result<DependencyIndex> {
    let mut graph = DiGraph::new();
    let mut node_indices = HashMap::new();
    let mut order = Vec::with_capacity(nodes.len());

    for node in nodes {
        if node.id.trim().is_empty() {
            return Err(WorkflowError::malformed_node(None, "node is missing a required id"));
        }
        if node_indices.contains_key(&node.id) {
            return Err(WorkflowError::malformed_node(
                Some(&node.id),
                format!("duplicate node id '{}'", node.id),
            ));
        }
        let idx = graph.add_node(node.id.clone());
        node_indices.insert(node.id.clone(), idx);
        order.push(node.id.clone());
    }

    let mut incoming: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut outgoing: HashMap<String, BTreeSet<String>> = HashMap::new();

    for edge in edges {
        let Some(&s) = node_indices.get(&edge.source) else {
            return Err(WorkflowError::malformed_edge(&edge.id, &edge.source, "source"));
        };
        let Some(&t) = node_indices.get(&edge.target) else {
            return Err(WorkflowError::malformed_edge(&edge.id, &edge.target, "target"));
        };

        let fresh = outgoing
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone());
        incoming
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());

        // Duplicate edges collapse into one dependency.
        if fresh {
            graph.add_edge(s, t, ());
        }
    }

    debug!(
        nodes = order.len(),
        edges = graph.edge_count(),
        "built dependency index"
    );

    Ok(DependencyIndex {
        order,
        incoming,
        outgoing,
        graph,
        node_indices,
    })
}

impl DependencyIndex {
    /// Node ids in input order.
    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.node_indices.contains_key(node_id)
    }

    /// Position of the node in the input array.
    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.node_indices.get(node_id).map(|idx| idx.index())
    }

    pub fn incoming(&self, node_id: &str) -> &BTreeSet<String> {
        self.incoming.get(node_id).unwrap_or(&EMPTY)
    }

    pub fn outgoing(&self, node_id: &str) -> &BTreeSet<String> {
        self.outgoing.get(node_id).unwrap_or(&EMPTY)
    }

    pub fn in_degree(&self, node_id: &str) -> usize {
        self.incoming(node_id).len()
    }

    pub fn out_degree(&self, node_id: &str) -> usize {
        self.outgoing(node_id).len()
    }

    /// Successors sorted by input order.
    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.in_input_order(self.outgoing(node_id))
    }

    /// Predecessors sorted by input order.
    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.in_input_order(self.incoming(node_id))
    }

    /// Nodes without incoming edges, in input order.
    pub fn roots(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.incoming(id).is_empty())
            .map(String::as_str)
            .collect()
    }

    pub fn is_isolated(&self, node_id: &str) -> bool {
        self.incoming(node_id).is_empty() && self.outgoing(node_id).is_empty()
    }

    /// One cycle's members (in input order), if the graph has any.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .collect();

        for scc in &mut cycles {
            scc.sort();
        }
        cycles.sort_by_key(|scc| scc[0]);

        cycles
            .into_iter()
            .next()
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    /// Fail with `CyclicGraph` if any cycle exists.
    pub fn ensure_acyclic(&self, phase: Phase) -> Result<()> {
        match self.find_cycle() {
            Some(nodes) => Err(WorkflowError::cycle(phase, nodes)),
            None => Ok(()),
        }
    }

    /// Whether `to` can be reached from `from` by following outgoing edges.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let (Some(&start), Some(&goal)) = (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        if start == goal {
            return self
                .outgoing(from)
                .iter()
                .any(|succ| succ == from || self.reaches(succ, from));
        }

        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(nx) = bfs.next(&self.graph) {
            if nx == goal {
                return true;
            }
        }
        false
    }

    /// Kahn's algorithm. Among ready nodes the smallest `priority` goes first,
    /// then input order.
    pub fn topological_order<P, F>(&self, phase: Phase, priority: F) -> Result<Vec<String>>
    where
        P: Ord,
        F: Fn(&str) -> P,
    {
        let mut remaining: HashMap<&str, usize> = self
            .order
            .iter()
            .map(|id| (id.as_str(), self.in_degree(id)))
            .collect();

        let mut ready = BinaryHeap::new();
        for (pos, id) in self.order.iter().enumerate() {
            if remaining[id.as_str()] == 0 {
                ready.push(Reverse((priority(id), pos)));
            }
        }

        let mut sorted = Vec::with_capacity(self.order.len());
        while let Some(Reverse((_, pos))) = ready.pop() {
            let id = &self.order[pos];
            sorted.push(id.clone());
            for succ in self.outgoing(id) {
                let Some(count) = remaining.get_mut(succ.as_str()) else {
                    continue;
                };
                *count -= 1;
                if *count == 0 {
                    if let Some(succ_pos) = self.position_of(succ) {
                        ready.push(Reverse((priority(succ), succ_pos)));
                    }
                }
            }
        }

        if sorted.len() < self.order.len() {
            let placed: HashSet<&str> = sorted.iter().map(String::as_str).collect();
            let stuck = self
                .find_cycle()
                .unwrap_or_else(|| {
                    self.order
                        .iter()
                        .filter(|id| !placed.contains(id.as_str()))
                        .cloned()
                        .collect()
                });
            return Err(WorkflowError::cycle(phase, stuck));
        }

        Ok(sorted)
    }

    fn in_input_order<'a>(&'a self, ids: &'a BTreeSet<String>) -> Vec<&'a str> {
        let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
        sorted.sort_by_key(|id| self.position_of(id).unwrap_or(usize::MAX));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Position, StepData};

    fn node(id: &str) -> Node {
        Node::new(id, Position::default(), StepData::shell("true"))
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge::new(format!("{source}-{target}"), source, target)
    }

    #[test]
    fn records_both_directions() {
        let index = build_index(&[node("a"), node("b")], &[edge("a", "b")]).unwrap();
        assert!(index.outgoing("a").contains("b"));
        assert!(index.incoming("b").contains("a"));
        assert!(index.incoming("a").is_empty());
        assert!(index.outgoing("b").is_empty());
    }

    #[test]
    fn unknown_nodes_default_to_empty_sets() {
        let index = build_index(&[node("a")], &[]).unwrap();
        assert!(index.incoming("missing").is_empty());
        assert_eq!(index.out_degree("missing"), 0);
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let err = build_index(&[node("a")], &[edge("a", "ghost")]).unwrap_err();
        assert!(matches!(err, WorkflowError::MalformedGraph { .. }));
        assert_eq!(err.node_ids(), vec!["ghost"]);
    }

    #[test]
    fn duplicate_and_empty_ids_are_rejected() {
        let err = build_index(&[node("a"), node("a")], &[]).unwrap_err();
        assert!(err.to_string().contains("duplicate node id 'a'"));

        let err = build_index(&[node(" ")], &[]).unwrap_err();
        assert!(err.to_string().contains("missing a required id"));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let index = build_index(&[node("a"), node("b")], &[edge("a", "b"), edge("a", "b")]).unwrap();
        assert_eq!(index.out_degree("a"), 1);
        assert_eq!(index.in_degree("b"), 1);
    }

    #[test]
    fn finds_cycle_members() {
        let index = build_index(
            &[node("a"), node("b"), node("c"), node("d")],
            &[edge("a", "b"), edge("b", "c"), edge("c", "b"), edge("c", "d")],
        )
        .unwrap();
        assert_eq!(index.find_cycle(), Some(vec!["b".to_string(), "c".to_string()]));
        assert!(index.ensure_acyclic(Phase::Analyze).is_err());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let index = build_index(&[node("a")], &[edge("a", "a")]).unwrap();
        assert_eq!(index.find_cycle(), Some(vec!["a".to_string()]));
        assert!(index.reaches("a", "a"));
    }

    #[test]
    fn reachability_is_directional() {
        let index = build_index(
            &[node("a"), node("b"), node("c")],
            &[edge("a", "b"), edge("b", "c")],
        )
        .unwrap();
        assert!(index.reaches("a", "c"));
        assert!(!index.reaches("c", "a"));
        assert!(!index.reaches("a", "a"));
    }

    #[test]
    fn topological_order_respects_priority_among_ready_nodes() {
        let index = build_index(
            &[node("late"), node("early"), node("child")],
            &[edge("late", "child"), edge("early", "child")],
        )
        .unwrap();
        let order = index
            .topological_order(Phase::Synthesize, |id| if id == "early" { 0 } else { 1 })
            .unwrap();
        assert_eq!(order, vec!["early", "late", "child"]);
    }

    #[test]
    fn topological_order_reports_cycle() {
        let index = build_index(
            &[node("a"), node("b")],
            &[edge("a", "b"), edge("b", "a")],
        )
        .unwrap();
        let err = index.topological_order(Phase::Synthesize, |_| 0).unwrap_err();
        assert_eq!(err.node_ids(), vec!["a", "b"]);
    }
}
