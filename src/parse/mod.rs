//! Parse phase: workflow YAML (or the AI service's JSON) → graph.
//!
//! Every step becomes a node; consecutive steps in a job are chained, and each
//! `needs` entry links the last step of the needed job to the first step of
//! the dependent job. Job-level dependencies carry no step granularity, so
//! this direction is lossy for branched graphs.

pub mod document;

pub use document::{JobDocument, Needs, StepDocument, WorkflowDocument};

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::error::{Result, WorkflowError};
use crate::graph::{Edge, Graph, Node, Position, StepData, StepKind};
use document::{text_map, truthy, value_text};

/// Horizontal distance between jobs on the canvas.
pub const JOB_SPACING: f64 = 300.0;
/// Vertical distance between steps of one job.
pub const STEP_SPACING: f64 = 120.0;

/// Parse workflow YAML text into a graph. A document without `jobs:` yields
/// an empty graph.
pub fn parse(yaml: &str) -> Result<Graph> {
    if yaml.trim().is_empty() {
        return Ok(Graph::default());
    }

    let mut value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(Graph::default());
    }
    // Expand `<<: *anchor` so shared step fields reach every step.
    value.apply_merge()?;
    let document: WorkflowDocument = serde_yaml::from_value(value)?;
    ingest(&document)
}

/// Build a graph from the AI service's `{name, on, jobs}` JSON.
pub fn ingest_json(value: serde_json::Value) -> Result<Graph> {
    let document: WorkflowDocument =
        serde_json::from_value(value).map_err(|e| WorkflowError::YamlSyntax {
            message: format!("invalid workflow document: {e}"),
            line: None,
            column: None,
        })?;
    ingest(&document)
}

/// Map a deserialized workflow onto nodes and edges.
pub fn ingest(document: &WorkflowDocument) -> Result<Graph> {
    let Some(jobs) = &document.jobs else {
        return Ok(Graph::default());
    };

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen_edges = HashSet::new();
    // job id → (first node id, last node id)
    let mut bounds: IndexMap<&str, (String, String)> = IndexMap::new();

    for (job_index, (job_id, job)) in jobs.iter().enumerate() {
        let mut previous: Option<String> = None;

        for (step_index, step) in job.steps().iter().enumerate() {
            let id = format!("{job_id}-step-{}", step_index + 1);
            let position = Position {
                x: job_index as f64 * JOB_SPACING,
                y: step_index as f64 * STEP_SPACING,
            };
            nodes.push(Node::new(id.clone(), position, step_data(step, step_index + 1)));

            if let Some(prev) = previous.replace(id.clone()) {
                push_edge(&mut edges, &mut seen_edges, &prev, &id);
            }
        }

        if let Some(last) = previous {
            bounds.insert(job_id.as_str(), (format!("{job_id}-step-1"), last));
        }
    }

    for (job_id, job) in jobs {
        let Some((first, _)) = bounds.get(job_id.as_str()).cloned() else {
            continue;
        };
        for needed in job.needs() {
            if needed == job_id.as_str() {
                warn!(job = %job_id, "skipping needs on the job itself");
                continue;
            }
            match bounds.get(needed) {
                Some((_, last)) => push_edge(&mut edges, &mut seen_edges, last, &first),
                None => warn!(job = %job_id, needs = %needed, "skipping needs on unknown or empty job"),
            }
        }
    }

    debug!(
        jobs = jobs.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "ingested workflow document"
    );
    Ok(Graph::new(nodes, edges))
}

fn push_edge(edges: &mut Vec<Edge>, seen: &mut HashSet<(String, String)>, source: &str, target: &str) {
    if seen.insert((source.to_string(), target.to_string())) {
        edges.push(Edge::new(format!("e-{source}-{target}"), source, target));
    }
}

/// Per-step mapping shared by YAML import and AI ingestion.
fn step_data(step: &StepDocument, number: usize) -> StepData {
    let kind = match step.uses.as_deref().map(str::trim) {
        Some(uses) if !uses.is_empty() => StepKind::Action {
            repository: uses.to_string(),
            inputs: step.with.as_ref().map(text_map).unwrap_or_default(),
        },
        _ => StepKind::Shell {
            command: step.run.as_ref().map(value_text).unwrap_or_default(),
        },
    };

    let name = step
        .name
        .as_ref()
        .map(value_text)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Step {number}"));

    StepData {
        name: Some(name),
        kind,
        env: step.env.as_ref().map(text_map).unwrap_or_default(),
        condition: step
            .condition
            .as_ref()
            .map(value_text)
            .filter(|c| !c.trim().is_empty()),
        continue_on_error: step.continue_on_error.as_ref().is_some_and(truthy),
        category: None,
    }
}
