use serde::Serialize;

use super::Analysis;
use super::structure::BottleneckKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HintKind {
    SplitBottleneck,
    RunInParallel,
    ConnectIsolated,
    ShortenCriticalPath,
}

/// One suggestion banner for the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub kind: HintKind,
    pub message: String,
    pub node_ids: Vec<String>,
}

/// Chains at least this long get a critical-path hint.
const LONG_CHAIN: usize = 5;

pub fn hints(analysis: &Analysis) -> Vec<Hint> {
    let mut out = Vec::new();

    for group in &analysis.parallelizable {
        out.push(Hint {
            kind: HintKind::RunInParallel,
            message: format!(
                "steps {} share the same prerequisites and can run as parallel jobs",
                join(&group.nodes)
            ),
            node_ids: group.nodes.clone(),
        });
    }

    for bottleneck in &analysis.bottlenecks {
        let message = match bottleneck.kind {
            BottleneckKind::FanIn => format!(
                "step {} waits on {} steps; consider splitting the work that depends on it",
                bottleneck.node_id, bottleneck.incoming
            ),
            BottleneckKind::FanOut => format!(
                "{} steps wait on step {}; consider making it faster or splitting it",
                bottleneck.outgoing, bottleneck.node_id
            ),
            BottleneckKind::Both => format!(
                "step {} joins {} steps and gates {} more",
                bottleneck.node_id, bottleneck.incoming, bottleneck.outgoing
            ),
        };
        out.push(Hint {
            kind: HintKind::SplitBottleneck,
            message,
            node_ids: vec![bottleneck.node_id.clone()],
        });
    }

    if !analysis.isolated.is_empty() && analysis.isolated.len() < analysis.node_count {
        out.push(Hint {
            kind: HintKind::ConnectIsolated,
            message: format!(
                "steps {} are not connected to the rest of the workflow",
                join(&analysis.isolated)
            ),
            node_ids: analysis.isolated.clone(),
        });
    }

    if analysis.critical_path.len() >= LONG_CHAIN {
        out.push(Hint {
            kind: HintKind::ShortenCriticalPath,
            message: format!(
                "the longest chain has {} sequential steps; parallelizing any of them shortens the run",
                analysis.critical_path.len()
            ),
            node_ids: analysis.critical_path.nodes.clone(),
        });
    }

    out
}

fn join(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
