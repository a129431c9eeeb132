//! Rust types mirroring the canvas workflow JSON.
//!
//! These types are the serde target for the graph the editor persists:
//! `{ nodes: [...], edges: [...] }` with camelCase keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL GRAPH
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// "`target` executes after `source`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub data: StepData,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, data: StepData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }
}

/// What a step executes, decided once when the node is created or deserialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    Shell {
        command: String,
    },
    Action {
        /// `owner/repo@ref`, `./local/path` or `docker://image`.
        repository: String,
        inputs: IndexMap<String, String>,
    },
}

impl StepKind {
    pub fn shell(command: impl Into<String>) -> Self {
        StepKind::Shell {
            command: command.into(),
        }
    }

    pub fn action(repository: impl Into<String>) -> Self {
        StepKind::Action {
            repository: repository.into(),
            inputs: IndexMap::new(),
        }
    }

    pub fn is_shell(&self) -> bool {
        matches!(self, StepKind::Shell { .. })
    }
}

/// A step payload. Serialized flat (`repository`, `command`, `inputs`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStepData", into = "RawStepData")]
pub struct StepData {
    pub name: Option<String>,
    pub kind: StepKind,
    pub env: IndexMap<String, String>,
    pub condition: Option<String>,
    pub continue_on_error: bool,
    /// Palette grouping in the editor. Not used for generation.
    pub category: Option<String>,
}

impl StepData {
    pub fn new(kind: StepKind) -> Self {
        Self {
            name: None,
            kind,
            env: IndexMap::new(),
            condition: None,
            continue_on_error: false,
            category: None,
        }
    }

    pub fn shell(command: impl Into<String>) -> Self {
        Self::new(StepKind::shell(command))
    }

    pub fn action(repository: impl Into<String>) -> Self {
        Self::new(StepKind::action(repository))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let StepKind::Action { inputs, .. } = &mut self.kind {
            inputs.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn continue_on_error(mut self, value: bool) -> Self {
        self.continue_on_error = value;
        self
    }

    /// The display name, ignoring blank labels.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// A `repository` of `"run"`, empty, or prefixed `"run:"` marks a shell step.
pub fn is_shell_repository(repository: &str) -> bool {
    let repository = repository.trim();
    repository.is_empty() || repository == "run" || repository.starts_with("run:")
}

// =============================================================================
// WIRE SHAPE
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    inputs: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    env: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(default)]
    continue_on_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl From<RawStepData> for StepData {
    fn from(raw: RawStepData) -> Self {
        let kind = if is_shell_repository(&raw.repository) {
            let command = match raw.command {
                Some(command) if !command.trim().is_empty() => command,
                _ => raw
                    .repository
                    .trim()
                    .strip_prefix("run:")
                    .map(|c| c.trim().to_string())
                    .unwrap_or_default(),
            };
            StepKind::Shell { command }
        } else {
            StepKind::Action {
                repository: raw.repository.trim().to_string(),
                inputs: raw.inputs,
            }
        };

        StepData {
            name: raw.name,
            kind,
            env: raw.env,
            condition: raw.condition.filter(|c| !c.trim().is_empty()),
            continue_on_error: raw.continue_on_error,
            category: raw.category,
        }
    }
}

impl From<StepData> for RawStepData {
    fn from(data: StepData) -> Self {
        let (repository, command, inputs) = match data.kind {
            StepKind::Shell { command } => ("run".to_string(), Some(command), IndexMap::new()),
            StepKind::Action { repository, inputs } => (repository, None, inputs),
        };

        RawStepData {
            name: data.name,
            repository,
            command,
            inputs,
            env: data.env,
            condition: data.condition,
            continue_on_error: data.continue_on_error,
            category: data.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_repository_variants() {
        assert!(is_shell_repository("run"));
        assert!(is_shell_repository(""));
        assert!(is_shell_repository("run: cargo test"));
        assert!(!is_shell_repository("actions/checkout@v4"));
    }

    #[test]
    fn deserialize_action_step() {
        let json = r#"{
            "name": "Checkout",
            "repository": "actions/checkout@v4",
            "inputs": { "fetch-depth": "0", "lfs": "" },
            "category": "setup"
        }"#;
        let data: StepData = serde_json::from_str(json).unwrap();
        match &data.kind {
            StepKind::Action { repository, inputs } => {
                assert_eq!(repository, "actions/checkout@v4");
                assert_eq!(inputs.keys().collect::<Vec<_>>(), vec!["fetch-depth", "lfs"]);
            }
            other => panic!("Expected action step, got {:?}", other),
        }
        assert_eq!(data.display_name(), Some("Checkout"));
    }

    #[test]
    fn deserialize_run_prefix_uses_embedded_command() {
        let json = r#"{ "repository": "run: make build" }"#;
        let data: StepData = serde_json::from_str(json).unwrap();
        assert_eq!(data.kind, StepKind::shell("make build"));
    }

    #[test]
    fn explicit_command_wins_over_prefix() {
        let json = r#"{ "repository": "run", "command": "npm test", "continueOnError": true }"#;
        let data: StepData = serde_json::from_str(json).unwrap();
        assert_eq!(data.kind, StepKind::shell("npm test"));
        assert!(data.continue_on_error);
    }

    #[test]
    fn serializes_flat_shape() {
        let data = StepData::shell("cargo test").named("Test");
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["repository"], "run");
        assert_eq!(value["command"], "cargo test");
        assert_eq!(value["continueOnError"], false);
        assert!(value.get("inputs").is_none());
    }

    #[test]
    fn blank_name_has_no_display_name() {
        let data = StepData::shell("ls").named("   ");
        assert_eq!(data.display_name(), None);
    }
}
