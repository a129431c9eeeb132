//! Integration tests for the Parse phase: workflow YAML and AI-service JSON into graphs.

mod helpers;

use actions_compiler::analyze::{AnalyzerConfig, analyze};
use actions_compiler::graph::StepKind;
use actions_compiler::parse::{JOB_SPACING, STEP_SPACING};
use actions_compiler::{WorkflowError, ingest_json, parse};
use helpers::edge_pairs;

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

#[test]
fn parse_node_ci_workflow() {
    let graph = parse(include_str!("fixtures/node_ci.yml")).expect("Should parse");
    assert_eq!(graph.nodes.len(), 6);
    assert_eq!(
        edge_pairs(&graph),
        pairs(&[
            ("build-step-1", "build-step-2"),
            ("build-step-2", "build-step-3"),
            ("build-step-3", "test-step-1"),
            ("build-step-3", "lint-step-1"),
            ("test-step-1", "deploy-step-1"),
            ("lint-step-1", "deploy-step-1"),
        ])
    );
}

#[test]
fn parse_maps_step_fields() {
    let graph = parse(include_str!("fixtures/node_ci.yml")).unwrap();

    let checkout = graph.node("build-step-1").unwrap();
    assert_eq!(checkout.data.name.as_deref(), Some("Step 1"));
    assert_eq!(checkout.data.kind, StepKind::action("actions/checkout@v4"));

    let setup = graph.node("build-step-2").unwrap();
    match &setup.data.kind {
        StepKind::Action { repository, inputs } => {
            assert_eq!(repository, "actions/setup-node@v4");
            let keys: Vec<&str> = inputs.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["node-version", "cache"]);
            assert_eq!(inputs["node-version"], "20");
        }
        other => panic!("Expected action, got {:?}", other),
    }

    let test = graph.node("test-step-1").unwrap();
    assert_eq!(test.data.kind, StepKind::shell("npm test\nnpm run coverage\n"));
    assert_eq!(test.data.env["CI"], "true");

    let lint = graph.node("lint-step-1").unwrap();
    assert!(lint.data.continue_on_error);

    let deploy = graph.node("deploy-step-1").unwrap();
    assert_eq!(deploy.data.condition.as_deref(), Some("success()"));
    assert_eq!(deploy.data.env["TOKEN"], "${{ secrets.DEPLOY_TOKEN }}");
}

#[test]
fn parse_lays_out_jobs_in_columns() {
    let graph = parse(include_str!("fixtures/node_ci.yml")).unwrap();
    let install = graph.node("build-step-3").unwrap();
    assert_eq!(install.position.x, 0.0);
    assert_eq!(install.position.y, 2.0 * STEP_SPACING);

    let deploy = graph.node("deploy-step-1").unwrap();
    assert_eq!(deploy.position.x, 3.0 * JOB_SPACING);
    assert_eq!(deploy.position.y, 0.0);
}

#[test]
fn parsed_workflow_can_be_analyzed() {
    let graph = parse(include_str!("fixtures/node_ci.yml")).unwrap();
    let analysis = analyze(&graph, &AnalyzerConfig::default()).unwrap();
    assert_eq!(
        analysis.critical_path.nodes,
        vec!["build-step-1", "build-step-2", "build-step-3", "test-step-1", "deploy-step-1"]
    );
    assert_eq!(analysis.parallelizable.len(), 1);
    assert_eq!(analysis.parallelizable[0].nodes, vec!["test-step-1", "lint-step-1"]);
}

#[test]
fn parse_invalid_yaml_returns_syntax_error() {
    let err = parse("jobs:\n  build:\n    steps:\n      - run: ls\n     bad: [").unwrap_err();
    assert_eq!(err.code(), "P001");
    assert!(matches!(err, WorkflowError::YamlSyntax { .. }));
}

#[test]
fn parse_wrong_shape_is_a_syntax_error() {
    let err = parse("jobs: [1, 2, 3]\n").unwrap_err();
    assert_eq!(err.code(), "P001");
}

#[test]
fn document_without_jobs_is_empty() {
    let graph = parse("name: Nothing here\non: push\n").unwrap();
    assert!(graph.is_empty());
}

#[test]
fn ai_workflow_shape_uses_the_same_mapping() {
    let generated = serde_json::json!({
        "name": "Generated",
        "on": "push",
        "jobs": {
            "build": {
                "runs-on": "ubuntu-latest",
                "steps": [
                    { "uses": "actions/checkout@v4" },
                    { "name": "Install", "run": "npm ci" }
                ]
            },
            "test": {
                "needs": "build",
                "steps": [ { "name": "Test", "run": "npm test", "continue-on-error": "true" } ]
            }
        }
    });
    let from_json = ingest_json(generated).unwrap();
    let from_yaml = parse(
        r#"
name: Generated
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Install
        run: npm ci
  test:
    needs: build
    steps:
      - name: Test
        run: npm test
        continue-on-error: "true"
"#,
    )
    .unwrap();
    assert_eq!(from_json, from_yaml);
    assert!(from_json.node("test-step-1").unwrap().data.continue_on_error);
}
