//! Analyze phase: structural facts about the step graph used for
//! optimisation suggestions. Independent of YAML emission.
//!
//! Public API: `analyze(graph, config) -> Analysis`

mod critical_path;
mod hints;
mod structure;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Phase, Result};
use crate::graph::{DependencyIndex, Graph, build_index};

pub use critical_path::{CriticalPath, find_critical_path};
pub use hints::{Hint, HintKind, hints};
pub use structure::{
    Bottleneck, BottleneckKind, ParallelGroup, find_bottlenecks, find_isolated,
    find_parallel_groups,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Fan-in or fan-out at or above this is a bottleneck.
    #[serde(default = "default_bottleneck_threshold")]
    pub bottleneck_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bottleneck_threshold: default_bottleneck_threshold(),
        }
    }
}

fn default_bottleneck_threshold() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub parallelizable: Vec<ParallelGroup>,
    pub bottlenecks: Vec<Bottleneck>,
    pub critical_path: CriticalPath,
    pub isolated: Vec<String>,
    pub node_count: usize,
}

/// Analyze a graph. Cycles are rejected before any traversal.
pub fn analyze(graph: &Graph, config: &AnalyzerConfig) -> Result<Analysis> {
    let index = build_index(&graph.nodes, &graph.edges)?;
    analyze_index(&index, config)
}

pub fn analyze_index(index: &DependencyIndex, config: &AnalyzerConfig) -> Result<Analysis> {
    index.ensure_acyclic(Phase::Analyze)?;

    let analysis = Analysis {
        parallelizable: find_parallel_groups(index),
        bottlenecks: find_bottlenecks(index, config.bottleneck_threshold),
        critical_path: find_critical_path(index)?,
        isolated: find_isolated(index),
        node_count: index.len(),
    };

    debug!(
        nodes = analysis.node_count,
        groups = analysis.parallelizable.len(),
        bottlenecks = analysis.bottlenecks.len(),
        critical = analysis.critical_path.len(),
        "analyzed workflow graph"
    );
    Ok(analysis)
}
