//! Synthesis phase: graph → GitHub Actions workflow YAML.
//!
//! Public API: `synthesize(graph, options) -> Synthesis`

mod jobs;
mod scalar;
mod steps;
mod triggers;
mod writer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::{Graph, Node, build_index};

pub use jobs::{Job, SINGLE_JOB_ID};
pub use triggers::{BranchFilter, Triggers};
use writer::YamlWriter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisOptions {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub triggers: Triggers,
    #[serde(default = "default_runs_on")]
    pub runs_on: String,
    #[serde(default)]
    pub multi_job: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            name: default_name(),
            triggers: Triggers::default(),
            runs_on: default_runs_on(),
            multi_job: false,
        }
    }
}

impl SynthesisOptions {
    pub fn multi_job() -> Self {
        Self {
            multi_job: true,
            ..Self::default()
        }
    }
}

fn default_name() -> String {
    "CI".to_string()
}

fn default_runs_on() -> String {
    "ubuntu-latest".to_string()
}

/// The generated document plus the job plan it was rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct Synthesis {
    pub yaml: String,
    pub jobs: Vec<Job>,
}

/// Generate workflow YAML. Malformed or (in multi-job mode) cyclic graphs are
/// rejected before any output is produced.
pub fn synthesize(graph: &Graph, options: &SynthesisOptions) -> Result<Synthesis> {
    let index = build_index(&graph.nodes, &graph.edges)?;

    let jobs = if graph.is_empty() {
        vec![Job {
            id: SINGLE_JOB_ID.to_string(),
            steps: Vec::new(),
            needs: Vec::new(),
        }]
    } else if options.multi_job {
        jobs::plan_multi_job(&graph.nodes, &index)?
    } else {
        jobs::plan_single_job(&graph.nodes)
    };

    let yaml = render(graph, &jobs, options);
    debug!(
        jobs = jobs.len(),
        bytes = yaml.len(),
        multi_job = options.multi_job,
        "synthesized workflow"
    );

    Ok(Synthesis { yaml, jobs })
}

fn render(graph: &Graph, jobs: &[Job], options: &SynthesisOptions) -> String {
    let nodes: HashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut w = YamlWriter::new();

    w.entry("name", &options.name);
    triggers::emit_triggers(&options.triggers, &mut w);
    w.map_open("jobs");

    let mut number = 0;
    for job in jobs {
        w.map_open(&scalar::scalar(&job.id));
        match job.needs.as_slice() {
            [] => {}
            [only] => w.entry("needs", only),
            many => {
                w.map_open("needs");
                for need in many {
                    w.item(need);
                }
                w.close();
            }
        }
        w.entry("runs-on", &options.runs_on);
        w.map_open("steps");

        if job.steps.is_empty() {
            steps::emit_placeholder_step(&mut w);
        }
        for id in &job.steps {
            number += 1;
            if let Some(node) = nodes.get(id.as_str()) {
                steps::emit_step(node, number, &mut w);
            }
        }

        w.close();
        w.close();
    }

    w.close();
    w.finish()
}
