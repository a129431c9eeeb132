//! WASM entry points for the browser canvas.
//!
//! Inputs arrive as JSON/YAML strings; results go back as JS objects tagged
//! with `status: "success" | "errors"`. The linter bridge is native-only.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::analyze::{Analysis, AnalyzerConfig, Hint};
use crate::check::GraphIssue;
use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::synth::{Job, SynthesisOptions};

/// Graph JSON + options JSON → workflow YAML and its job plan.
#[wasm_bindgen]
pub fn synthesize_workflow(graph_json: &str, options_json: &str) -> JsValue {
    to_js(&synthesize_inner(graph_json, options_json))
}

/// Workflow YAML → graph.
#[wasm_bindgen]
pub fn parse_workflow(yaml: &str) -> JsValue {
    to_js(&parse_inner(yaml))
}

/// AI service `{name, on, jobs}` JSON → graph.
#[wasm_bindgen]
pub fn import_generated_workflow(json: &str) -> JsValue {
    to_js(&import_inner(json))
}

/// Graph JSON + analyzer config JSON → analysis plus suggestion hints.
#[wasm_bindgen]
pub fn analyze_workflow(graph_json: &str, config_json: &str) -> JsValue {
    to_js(&analyze_inner(graph_json, config_json))
}

/// Graph JSON → every structural issue found. Never fails.
#[wasm_bindgen]
pub fn check_workflow(graph_json: &str) -> JsValue {
    to_js(&check_inner(graph_json))
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn synthesize_inner(graph_json: &str, options_json: &str) -> Outcome<SynthesizeDto> {
    let result = Graph::from_json(graph_json).and_then(|graph| {
        let options: SynthesisOptions = read_config(options_json)?;
        crate::synth::synthesize(&graph, &options)
    });
    Outcome::from(result.map(|s| SynthesizeDto {
        yaml: s.yaml,
        jobs: s.jobs,
    }))
}

fn parse_inner(yaml: &str) -> Outcome<Graph> {
    Outcome::from(crate::parse::parse(yaml))
}

fn import_inner(json: &str) -> Outcome<Graph> {
    let result = serde_json::from_str::<serde_json::Value>(json)
        .map_err(|e| WorkflowError::YamlSyntax {
            message: format!("invalid workflow document: {e}"),
            line: Some(e.line()),
            column: Some(e.column()),
        })
        .and_then(crate::parse::ingest_json);
    Outcome::from(result)
}

fn analyze_inner(graph_json: &str, config_json: &str) -> Outcome<AnalyzeDto> {
    let result = Graph::from_json(graph_json).and_then(|graph| {
        let config: AnalyzerConfig = read_config(config_json)?;
        crate::analyze::analyze(&graph, &config)
    });
    Outcome::from(result.map(|analysis| AnalyzeDto {
        hints: crate::analyze::hints(&analysis),
        analysis,
    }))
}

fn check_inner(graph_json: &str) -> Outcome<Vec<GraphIssue>> {
    Outcome::from(Graph::from_json(graph_json).map(|graph| crate::check::check_graph(&graph)))
}

/// Blank input means defaults.
fn read_config<T: DeserializeOwned + Default>(json: &str) -> Result<T, WorkflowError> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json)
        .map_err(|e| WorkflowError::malformed_node(None, format!("failed to read options: {e}")))
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_ids: Vec<String>,
}

impl From<WorkflowError> for ErrorDto {
    fn from(e: WorkflowError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            phase: e.phase().to_string(),
            node_ids: e.node_ids(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesizeDto {
    yaml: String,
    jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
struct AnalyzeDto {
    #[serde(flatten)]
    analysis: Analysis,
    hints: Vec<Hint>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome<T> {
    Success { result: T },
    Errors { errors: Vec<ErrorDto> },
}

impl<T> From<Result<T, WorkflowError>> for Outcome<T> {
    fn from(result: Result<T, WorkflowError>) -> Self {
        match result {
            Ok(result) => Outcome::Success { result },
            Err(e) => Outcome::Errors {
                errors: vec![ErrorDto::from(e)],
            },
        }
    }
}
