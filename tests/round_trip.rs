//! Graph → YAML → graph round trips and output determinism.

mod helpers;

use std::collections::HashMap;

use actions_compiler::graph::{Graph, Node, StepData, StepKind};
use actions_compiler::{SynthesisOptions, parse, synthesize};
use helpers::{at, edge};

/// Step content as it survives a trip through YAML: category is cosmetic and
/// blank inputs are dropped on emission.
fn portable(data: &StepData) -> StepData {
    let mut data = data.clone();
    data.category = None;
    if let StepKind::Action { inputs, .. } = &mut data.kind {
        inputs.retain(|_, v| !v.trim().is_empty());
    }
    data
}

fn by_name(graph: &Graph) -> HashMap<String, &Node> {
    graph
        .nodes
        .iter()
        .map(|n| (n.data.display_name().unwrap_or_default().to_string(), n))
        .collect()
}

/// Edges rewritten as `(source name, target name)`, sorted.
fn named_edges(graph: &Graph) -> Vec<(String, String)> {
    let names: HashMap<&str, &str> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.data.display_name().unwrap_or_default()))
        .collect();
    let mut pairs: Vec<(String, String)> = graph
        .edges
        .iter()
        .map(|e| (names[e.source.as_str()].to_string(), names[e.target.as_str()].to_string()))
        .collect();
    pairs.sort();
    pairs
}

fn assert_same_steps(original: &Graph, parsed: &Graph) {
    assert_eq!(original.nodes.len(), parsed.nodes.len());
    let parsed = by_name(parsed);
    for node in &original.nodes {
        let name = node.data.display_name().unwrap_or_default();
        let Some(other) = parsed.get(name) else {
            panic!("step '{name}' missing after round trip");
        };
        assert_eq!(portable(&node.data), other.data, "step '{name}'");
    }
}

fn rich_chain() -> Graph {
    let nodes = vec![
        Node::new(
            "n1",
            at(0.0, 0.0),
            StepData::action("actions/checkout@v4")
                .named("Checkout")
                .with_input("fetch-depth", "0")
                .with_input("token", ""),
        ),
        Node::new(
            "n2",
            at(0.0, 100.0),
            StepData::shell("cargo build --release\ncargo doc --no-deps")
                .named("Build: release")
                .with_env("RUSTFLAGS", "-D warnings")
                .with_env("VERBOSE", "yes"),
        ),
        Node::new(
            "n3",
            at(0.0, 200.0),
            StepData::shell("cargo test")
                .named("Test")
                .with_condition("github.event_name == 'push'")
                .continue_on_error(true),
        ),
        Node::new(
            "n4",
            at(0.0, 300.0),
            StepData::action("./.github/actions/publish")
                .named("Publish")
                .with_input("registry", "crates.io")
                .with_env("TOKEN", "${{ secrets.CRATES_TOKEN }}"),
        ),
    ];
    Graph::new(nodes, vec![edge("n1", "n2"), edge("n2", "n3"), edge("n3", "n4")])
}

#[test]
fn sequential_chain_survives_single_job_round_trip() {
    let original = rich_chain();
    let out = synthesize(&original, &SynthesisOptions::default()).expect("Should synthesize");
    let parsed = parse(&out.yaml).expect("Generated YAML should parse");

    assert_same_steps(&original, &parsed);
    assert_eq!(named_edges(&original), named_edges(&parsed));
}

#[test]
fn sequential_chain_survives_multi_job_round_trip() {
    let original = rich_chain();
    let out = synthesize(&original, &SynthesisOptions::multi_job()).expect("Should synthesize");
    assert_eq!(out.jobs.len(), 1);

    let parsed = parse(&out.yaml).expect("Generated YAML should parse");
    assert_same_steps(&original, &parsed);
    assert_eq!(named_edges(&original), named_edges(&parsed));
}

#[test]
fn branched_graph_survives_multi_job_round_trip() {
    // Cross-job edges always run from a job's last step to another job's
    // first step, so the `needs` reconstruction recovers every edge.
    let original = Graph::from_json(include_str!("fixtures/editor_graph.json")).unwrap();
    let out = synthesize(&original, &SynthesisOptions::multi_job()).unwrap();
    let parsed = parse(&out.yaml).unwrap();

    assert_same_steps(&original, &parsed);
    assert_eq!(named_edges(&original), named_edges(&parsed));
}

#[test]
fn synthesis_is_byte_identical() {
    let graph = Graph::from_json(include_str!("fixtures/editor_graph.json")).unwrap();
    for options in [SynthesisOptions::default(), SynthesisOptions::multi_job()] {
        let first = synthesize(&graph, &options).unwrap();
        let second = synthesize(&graph, &options).unwrap();
        assert_eq!(first.yaml, second.yaml);

        // Reloading the graph from its own JSON changes nothing either.
        let reloaded = Graph::from_json(&serde_json::to_string(&graph).unwrap()).unwrap();
        assert_eq!(synthesize(&reloaded, &options).unwrap().yaml, first.yaml);
    }
}

#[test]
fn empty_graph_produces_parseable_document() {
    let out = synthesize(&Graph::default(), &SynthesisOptions::default()).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&out.yaml).expect("valid YAML");
    assert!(value["jobs"]["build"]["steps"].is_sequence());

    let parsed = parse(&out.yaml).unwrap();
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.nodes[0].data.name.as_deref(), Some("Empty workflow"));
}

#[test]
fn number_like_and_separator_values_survive_round_trip() {
    let awkward = ["0b101", "+0x1", "+0b1", "-0o7", "+.inf", "-.INF", "a\u{2028}b", "a\u{2029}b"];
    let nodes = awkward
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let data = if i % 2 == 0 {
                StepData::shell(*value).with_env("VALUE", *value)
            } else {
                StepData::action("actions/setup-node@v4").with_input("node-version", *value)
            };
            Node::new(format!("n{i}"), at(0.0, i as f64 * 100.0), data.named(format!("step {i}")))
        })
        .collect();
    let original = Graph::new(nodes, Vec::new());

    let out = synthesize(&original, &SynthesisOptions::default()).unwrap();
    let parsed = parse(&out.yaml).expect("Generated YAML should parse");
    assert_same_steps(&original, &parsed);
}
