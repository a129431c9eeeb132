//! Serde shape of a GitHub Actions workflow document.
//!
//! Only the keys that map onto the graph are typed; everything else is ignored.
//! The same types back YAML import and the AI service's JSON `{name, on, jobs}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub on: Option<Value>,
    #[serde(default)]
    pub jobs: Option<IndexMap<String, JobDocument>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDocument {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub needs: Option<Needs>,
    #[serde(default, rename = "runs-on")]
    pub runs_on: Option<Value>,
    #[serde(default)]
    pub steps: Option<Vec<StepDocument>>,
}

impl JobDocument {
    pub fn steps(&self) -> &[StepDocument] {
        self.steps.as_deref().unwrap_or_default()
    }

    pub fn needs(&self) -> Vec<&str> {
        match &self.needs {
            None => Vec::new(),
            Some(Needs::One(job)) => vec![job.as_str()],
            Some(Needs::Many(jobs)) => jobs.iter().map(String::as_str).collect(),
        }
    }
}

/// `needs: build` or `needs: [build, test]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Needs {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepDocument {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub uses: Option<String>,
    #[serde(default)]
    pub run: Option<Value>,
    #[serde(default)]
    pub with: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub env: Option<IndexMap<String, Value>>,
    #[serde(default, rename = "if")]
    pub condition: Option<Value>,
    #[serde(default, rename = "continue-on-error")]
    pub continue_on_error: Option<Value>,
}

/// Textual form of a scalar as a workflow author would have written it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => value_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// `continue-on-error: true`, or the string `"true"`. Expressions count as false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

pub fn text_map(map: &IndexMap<String, Value>) -> IndexMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), value_text(v))).collect()
}
