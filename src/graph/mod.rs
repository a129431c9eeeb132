//! Graph model: nodes, edges and the dependency index built over them.

pub mod index;
pub mod types;

pub use index::{DependencyIndex, build_index};
pub use types::*;

use crate::error::{Result, WorkflowError};

impl Graph {
    /// Deserialize the editor's `{ nodes, edges }` JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<Graph>(json).map_err(|e| {
            WorkflowError::malformed_node(None, format!("failed to read workflow graph: {e}"))
        })
    }

    pub fn index(&self) -> Result<DependencyIndex> {
        build_index(&self.nodes, &self.edges)
    }
}
