//! Graph ⇄ GitHub Actions workflow compiler.
//!
//! Phases: `graph` (model + dependency index) → `synth` (YAML) and `analyze`
//! (structure), with `parse` running the other way and `lint` handing the
//! generated YAML to an external linter.

pub mod analyze;
pub mod check;
pub mod error;
pub mod graph;
pub mod lint;
pub mod parse;
pub mod synth;
pub mod wasm;

pub use analyze::{Analysis, AnalyzerConfig, analyze};
pub use check::{GraphIssue, check_graph};
pub use error::{Phase, Result, WorkflowError};
pub use graph::{DependencyIndex, Edge, Graph, Node, Position, StepData, StepKind, build_index};
pub use lint::{LintReport, LinterConfig, validate};
pub use parse::{ingest_json, parse};
pub use synth::{Synthesis, SynthesisOptions, synthesize};
