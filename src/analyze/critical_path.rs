//! Longest dependency chain (by node count) through the DAG.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{Phase, Result, WorkflowError};
use crate::graph::DependencyIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPath {
    /// Node ids from root to sink.
    pub nodes: Vec<String>,
    /// Every node not on the path, in input order.
    pub non_critical: Vec<String>,
}

impl CriticalPath {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|n| n == node_id)
    }
}

/// Longest path from any root. Ties keep the earliest node in input order.
pub fn find_critical_path(index: &DependencyIndex) -> Result<CriticalPath> {
    let roots = index.roots();
    if roots.is_empty() && !index.is_empty() {
        return Err(cycle_error(index, None));
    }

    let mut longest = Longest {
        index,
        memo: HashMap::new(),
        visiting: HashSet::new(),
    };

    let mut best: Option<(&str, usize)> = None;
    for root in roots {
        let len = longest.chain_from(root)?;
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((root, len));
        }
    }

    let mut nodes = Vec::new();
    let mut cursor = best.map(|(root, _)| root);
    while let Some(id) = cursor {
        nodes.push(id.to_string());
        cursor = longest.memo.get(id).and_then(|(_, next)| *next);
    }

    let on_path: HashSet<&str> = nodes.iter().map(String::as_str).collect();
    let non_critical = index
        .node_ids()
        .iter()
        .filter(|id| !on_path.contains(id.as_str()))
        .cloned()
        .collect();

    Ok(CriticalPath {
        nodes,
        non_critical,
    })
}

struct Longest<'a> {
    index: &'a DependencyIndex,
    /// node → (longest chain starting here, next node on that chain)
    memo: HashMap<&'a str, (usize, Option<&'a str>)>,
    /// Nodes on the current DFS stack.
    visiting: HashSet<&'a str>,
}

impl<'a> Longest<'a> {
    fn chain_from(&mut self, id: &'a str) -> Result<usize> {
        if let Some(&(len, _)) = self.memo.get(id) {
            return Ok(len);
        }
        if !self.visiting.insert(id) {
            return Err(cycle_error(self.index, Some(id)));
        }

        let index = self.index;
        let mut best: (usize, Option<&'a str>) = (1, None);
        for succ in index.successors(id) {
            let len = 1 + self.chain_from(succ)?;
            if len > best.0 {
                best = (len, Some(succ));
            }
        }

        self.visiting.remove(id);
        self.memo.insert(id, best);
        Ok(best.0)
    }
}

fn cycle_error(index: &DependencyIndex, at: Option<&str>) -> WorkflowError {
    let nodes = index
        .find_cycle()
        .or_else(|| at.map(|id| vec![id.to_string()]))
        .unwrap_or_default();
    WorkflowError::cycle(Phase::Analyze, nodes)
}
