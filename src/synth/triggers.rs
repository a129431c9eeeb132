//! `on:` block generation.

use serde::{Deserialize, Serialize};

use super::writer::YamlWriter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triggers {
    #[serde(default)]
    pub push: Option<BranchFilter>,
    #[serde(default)]
    pub pull_request: Option<BranchFilter>,
    #[serde(default)]
    pub workflow_dispatch: bool,
    /// Cron expressions.
    #[serde(default)]
    pub schedule: Vec<String>,
}

impl Default for Triggers {
    fn default() -> Self {
        Self {
            push: Some(BranchFilter::branches(["main"])),
            pull_request: Some(BranchFilter::branches(["main"])),
            workflow_dispatch: false,
            schedule: Vec::new(),
        }
    }
}

impl Triggers {
    pub fn none() -> Self {
        Self {
            push: None,
            pull_request: None,
            workflow_dispatch: false,
            schedule: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.push.is_none()
            && self.pull_request.is_none()
            && !self.workflow_dispatch
            && self.schedule.is_empty()
    }
}

/// An empty branch list means "all branches".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFilter {
    #[serde(default)]
    pub branches: Vec<String>,
}

impl BranchFilter {
    pub fn branches<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            branches: branches.into_iter().map(Into::into).collect(),
        }
    }
}

/// Emit the `on:` block. With nothing enabled, falls back to `workflow_dispatch`
/// so the document stays a runnable workflow.
pub fn emit_triggers(triggers: &Triggers, w: &mut YamlWriter) {
    w.map_open("on");

    if triggers.is_empty() {
        w.empty_entry("workflow_dispatch");
        w.close();
        return;
    }

    if let Some(push) = &triggers.push {
        emit_branch_filter("push", push, w);
    }
    if let Some(pull_request) = &triggers.pull_request {
        emit_branch_filter("pull_request", pull_request, w);
    }
    if triggers.workflow_dispatch {
        w.empty_entry("workflow_dispatch");
    }
    if !triggers.schedule.is_empty() {
        w.map_open("schedule");
        for cron in &triggers.schedule {
            w.item_open("cron", cron);
            w.close();
        }
        w.close();
    }

    w.close();
}

fn emit_branch_filter(event: &str, filter: &BranchFilter, w: &mut YamlWriter) {
    if filter.branches.is_empty() {
        w.empty_entry(event);
        return;
    }
    w.map_open(event);
    w.map_open("branches");
    for branch in &filter.branches {
        w.item(branch);
    }
    w.close();
    w.close();
}
