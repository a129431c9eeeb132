//! Per-step checks (G006–G007). Both are warnings: synthesis still succeeds.

use super::GraphIssue;
use crate::graph::{Node, StepKind};

pub fn check_step(node: &Node) -> Vec<GraphIssue> {
    let mut issues = Vec::new();
    match &node.data.kind {
        StepKind::Shell { command } => g006_shell_has_command(node, command, &mut issues),
        StepKind::Action { repository, .. } => {
            g007_action_reference(node, repository, &mut issues)
        }
    }
    issues
}

fn g006_shell_has_command(node: &Node, command: &str, issues: &mut Vec<GraphIssue>) {
    if command.trim().is_empty() {
        issues.push(GraphIssue::warning(
            "G006",
            format!(
                "Shell step '{}' has no command; a placeholder will be generated",
                label(node)
            ),
            Some(node.id.clone()),
        ));
    }
}

fn g007_action_reference(node: &Node, repository: &str, issues: &mut Vec<GraphIssue>) {
    if !is_action_reference(repository) {
        issues.push(GraphIssue::warning(
            "G007",
            format!(
                "Step '{}' uses '{}', expected owner/repo@ref, ./path or docker://image",
                label(node),
                repository
            ),
            Some(node.id.clone()),
        ));
    }
}

/// `owner/repo[/path]@ref`, a local `./path`, or `docker://image`.
pub fn is_action_reference(reference: &str) -> bool {
    if reference.chars().any(char::is_whitespace) {
        return false;
    }
    if let Some(path) = reference.strip_prefix("./") {
        return !path.is_empty();
    }
    if let Some(image) = reference.strip_prefix("docker://") {
        return !image.is_empty();
    }

    let Some((path, git_ref)) = reference.rsplit_once('@') else {
        return false;
    };
    let mut segments = path.split('/');
    let owner = segments.next().unwrap_or_default();
    let repo = segments.next().unwrap_or_default();
    !owner.is_empty()
        && !repo.is_empty()
        && segments.all(|s| !s.is_empty())
        && !git_ref.is_empty()
}

fn label(node: &Node) -> &str {
    node.data.display_name().unwrap_or(&node.id)
}
