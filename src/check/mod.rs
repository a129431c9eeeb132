//! Non-fatal graph checks for the canvas.
//!
//! Unlike `build_index`, which stops at the first malformed edge, these
//! collect every problem so the UI can show them all at once.

mod steps;
mod structural;

use serde::Serialize;
use tracing::debug;

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphIssue {
    pub code: String,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl GraphIssue {
    pub fn error(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        GraphIssue {
            code: code.into(),
            severity: IssueSeverity::Error,
            message: message.into(),
            node_id,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        GraphIssue {
            code: code.into(),
            severity: IssueSeverity::Warning,
            message: message.into(),
            node_id,
        }
    }
}

/// Run every check. Errors come first, then per-step warnings.
pub fn check_graph(graph: &Graph) -> Vec<GraphIssue> {
    let mut issues = structural::check_structure(graph);
    for node in &graph.nodes {
        issues.extend(steps::check_step(node));
    }
    debug!(issues = issues.len(), "checked workflow graph");
    issues
}

/// True if no error-severity issue was found.
pub fn is_buildable(issues: &[GraphIssue]) -> bool {
    issues.iter().all(|i| i.severity != IssueSeverity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node, Position, StepData};

    #[test]
    fn clean_graph_has_no_issues() {
        let graph = Graph::new(
            vec![
                Node::new("a", Position::default(), StepData::action("actions/checkout@v4")),
                Node::new("b", Position::default(), StepData::shell("make")),
            ],
            vec![Edge::new("e1", "a", "b")],
        );
        let issues = check_graph(&graph);
        assert!(issues.is_empty(), "{:?}", issues);
        assert!(is_buildable(&issues));
    }

    #[test]
    fn collects_every_problem() {
        let graph = Graph::new(
            vec![
                Node::new("a", Position::default(), StepData::shell("")),
                Node::new("a", Position::default(), StepData::action("checkout")),
            ],
            vec![Edge::new("e1", "a", "ghost"), Edge::new("e2", "a", "a")],
        );
        let issues = check_graph(&graph);
        let codes: Vec<&str> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["G001", "G002", "G004", "G006", "G007"]);
        assert!(!is_buildable(&issues));
    }

    #[test]
    fn serializes_for_the_canvas() {
        let issue = GraphIssue::warning("G006", "empty", Some("n1".into()));
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "G006",
                "severity": "warning",
                "message": "empty",
                "nodeId": "n1"
            })
        );
    }
}
