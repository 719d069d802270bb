use serde::{Deserialize, Serialize};

/// Acceptance thresholds applied by the validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityThresholds {
    /// At least a trigger plus one action.
    pub minimum_nodes: usize,
    pub maximum_nodes: usize,
    /// Generated graphs are annotated with sticky notes.
    pub required_documentation: bool,
    pub credential_validation: bool,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            minimum_nodes: 2,
            maximum_nodes: 50,
            required_documentation: true,
            credential_validation: true,
        }
    }
}
