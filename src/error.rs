//! Unified error type used across all phases.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Index,
    Synthesize,
    Parse,
    Analyze,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Index => write!(f, "Index"),
            Phase::Synthesize => write!(f, "Synthesize"),
            Phase::Parse => write!(f, "Parse"),
            Phase::Analyze => write!(f, "Analyze"),
        }
    }
}

/// Structural failures surfaced to the caller. None of these are repaired silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// An edge points at a node that does not exist, or a node has no usable id.
    #[error("malformed graph: {reason}")]
    MalformedGraph {
        reason: String,
        edge_id: Option<String>,
        node_id: Option<String>,
    },

    /// The dependency graph is not acyclic. `nodes` lists the steps on the cycle.
    #[error("{}", describe_cycle(.nodes))]
    CyclicGraph { phase: Phase, nodes: Vec<String> },

    /// The YAML document could not be deserialized.
    #[error("{}", describe_yaml(.message, .line, .column))]
    YamlSyntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
}

impl WorkflowError {
    pub fn malformed_edge(edge_id: &str, node_id: &str, side: &str) -> Self {
        WorkflowError::MalformedGraph {
            reason: format!("edge '{edge_id}' references unknown {side} node '{node_id}'"),
            edge_id: Some(edge_id.to_string()),
            node_id: Some(node_id.to_string()),
        }
    }

    pub fn malformed_node(node_id: Option<&str>, reason: impl Into<String>) -> Self {
        WorkflowError::MalformedGraph {
            reason: reason.into(),
            edge_id: None,
            node_id: node_id.map(str::to_string),
        }
    }

    pub fn cycle(phase: Phase, nodes: Vec<String>) -> Self {
        WorkflowError::CyclicGraph { phase, nodes }
    }

    /// Stable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::MalformedGraph { .. } => "G100",
            WorkflowError::CyclicGraph { .. } => "G101",
            WorkflowError::YamlSyntax { .. } => "P001",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            WorkflowError::MalformedGraph { .. } => Phase::Index,
            WorkflowError::CyclicGraph { phase, .. } => *phase,
            WorkflowError::YamlSyntax { .. } => Phase::Parse,
        }
    }

    /// Node ids the error is about, for highlighting on the canvas.
    pub fn node_ids(&self) -> Vec<String> {
        match self {
            WorkflowError::MalformedGraph { node_id, .. } => node_id.iter().cloned().collect(),
            WorkflowError::CyclicGraph { nodes, .. } => nodes.clone(),
            WorkflowError::YamlSyntax { .. } => Vec::new(),
        }
    }
}

impl From<serde_yaml::Error> for WorkflowError {
    fn from(e: serde_yaml::Error) -> Self {
        let location = e.location();
        WorkflowError::YamlSyntax {
            message: e.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}

fn describe_cycle(nodes: &[String]) -> String {
    match nodes {
        [] => "workflow contains a circular dependency".to_string(),
        [only] => format!("workflow contains a circular dependency on step {only}"),
        [first, .., last] => format!(
            "workflow contains a circular dependency between steps {first} and {last}"
        ),
    }
}

fn describe_yaml(message: &str, line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => {
            format!("invalid YAML at line {line}, column {column}: {message}")
        }
        _ => format!("invalid YAML: {message}"),
    }
}
