//! Step emission: one `- name: ...` item per node.

use crate::graph::{Node, StepKind};

use super::scalar::scalar;
use super::writer::YamlWriter;

pub const PLACEHOLDER_COMMAND: &str = "echo \"Add a command for this step\"";
pub const EMPTY_WORKFLOW_STEP: &str = "Empty workflow";
pub const EMPTY_WORKFLOW_COMMAND: &str = "echo \"This workflow has no steps yet\"";

/// Emit a single step. `number` is the 1-based position used for unnamed steps.
pub fn emit_step(node: &Node, number: usize, w: &mut YamlWriter) {
    let data = &node.data;
    let name = data
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Step {number}"));

    w.item_open("name", &name);

    if let Some(condition) = &data.condition {
        w.entry("if", condition);
    }

    match &data.kind {
        StepKind::Shell { command } => {
            let command = if command.trim().is_empty() {
                PLACEHOLDER_COMMAND
            } else {
                command.as_str()
            };
            w.entry("run", command);
        }
        StepKind::Action { repository, inputs } => {
            w.entry("uses", repository);
            let present: Vec<(&String, &String)> = inputs
                .iter()
                .filter(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty())
                .collect();
            if !present.is_empty() {
                w.map_open("with");
                for (key, value) in present {
                    w.entry(&scalar(key), value);
                }
                w.close();
            }
        }
    }

    let env: Vec<(&String, &String)> = data.env.iter().filter(|(k, _)| !k.trim().is_empty()).collect();
    if !env.is_empty() {
        w.map_open("env");
        for (key, value) in env {
            w.entry(&scalar(key), value);
        }
        w.close();
    }

    if data.continue_on_error {
        w.raw_entry("continue-on-error", "true");
    }

    w.close();
}

/// The step emitted when a workflow has no nodes.
pub fn emit_placeholder_step(w: &mut YamlWriter) {
    w.item_open("name", EMPTY_WORKFLOW_STEP);
    w.entry("run", EMPTY_WORKFLOW_COMMAND);
    w.close();
}
