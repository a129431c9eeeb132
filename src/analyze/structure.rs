//! Fan-in/fan-out bottlenecks and parallelizable step groups.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::graph::DependencyIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BottleneckKind {
    FanIn,
    FanOut,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub node_id: String,
    pub incoming: usize,
    pub outgoing: usize,
    pub kind: BottleneckKind,
}

/// Steps that can run side by side: same prerequisites, same dependents, and
/// no path between any two of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelGroup {
    pub nodes: Vec<String>,
    pub prerequisites: Vec<String>,
    pub dependents: Vec<String>,
}

pub fn find_isolated(index: &DependencyIndex) -> Vec<String> {
    index
        .node_ids()
        .iter()
        .filter(|id| index.is_isolated(id))
        .cloned()
        .collect()
}

/// Nodes whose fan-in or fan-out reaches `threshold`.
pub fn find_bottlenecks(index: &DependencyIndex, threshold: usize) -> Vec<Bottleneck> {
    index
        .node_ids()
        .iter()
        .filter_map(|id| {
            let incoming = index.in_degree(id);
            let outgoing = index.out_degree(id);
            let kind = match (incoming >= threshold, outgoing >= threshold) {
                (true, true) => BottleneckKind::Both,
                (true, false) => BottleneckKind::FanIn,
                (false, true) => BottleneckKind::FanOut,
                (false, false) => return None,
            };
            Some(Bottleneck {
                node_id: id.clone(),
                incoming,
                outgoing,
                kind,
            })
        })
        .collect()
}

/// Group non-isolated nodes by (prerequisites, dependents), then keep only
/// members that cannot reach each other. Groups are ordered by first member.
pub fn find_parallel_groups(index: &DependencyIndex) -> Vec<ParallelGroup> {
    let mut candidates: IndexMap<(&BTreeSet<String>, &BTreeSet<String>), Vec<&str>> =
        IndexMap::new();

    for id in index.node_ids() {
        if index.is_isolated(id) {
            continue;
        }
        candidates
            .entry((index.incoming(id), index.outgoing(id)))
            .or_default()
            .push(id.as_str());
    }

    let mut groups = Vec::new();
    for members in candidates.into_values() {
        if members.len() < 2 {
            continue;
        }

        let mut group: Vec<&str> = Vec::with_capacity(members.len());
        for candidate in members {
            let independent = group
                .iter()
                .all(|other| !index.reaches(candidate, other) && !index.reaches(other, candidate));
            if independent {
                group.push(candidate);
            }
        }

        if group.len() >= 2 {
            let first = group[0];
            groups.push(ParallelGroup {
                prerequisites: owned(index.predecessors(first)),
                dependents: owned(index.successors(first)),
                nodes: owned(group),
            });
        }
    }

    groups
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}
