use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The part a node plays in a workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeRole {
    Trigger,
    #[default]
    Action,
    Condition,
    DataOp,
    ErrorHandler,
    Annotation,
}

impl NodeRole {
    /// Best-effort role recovery for nodes read back from JSON, where roles are not stored.
    pub fn infer_from_type(node_type: &str) -> Self {
        let short = node_type.rsplit('.').next().unwrap_or(node_type);
        match short {
            "stickyNote" => NodeRole::Annotation,
            "cron" | "webhook" | "scheduleTrigger" => NodeRole::Trigger,
            "if" | "filter" | "switch" => NodeRole::Condition,
            "set" | "merge" | "splitInBatches" | "aggregate" => NodeRole::DataOp,
            s if s.ends_with("Trigger") => NodeRole::Trigger,
            _ => NodeRole::Action,
        }
    }

    pub fn is_executable(&self) -> bool {
        !matches!(self, NodeRole::Annotation)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeRole::Trigger => "trigger",
            NodeRole::Action => "action",
            NodeRole::Condition => "condition",
            NodeRole::DataOp => "dataOp",
            NodeRole::ErrorHandler => "errorHandler",
            NodeRole::Annotation => "annotation",
        };
        f.write_str(name)
    }
}

/// A named credential placeholder. Values are never inlined; the runtime resolves
/// the credential by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialReference {
    pub name: String,
}

fn default_type_version() -> f64 {
    1.0
}

fn default_outputs() -> u32 {
    1
}

/// Concrete node definition behind a semantic key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCatalogEntry {
    pub node_type: String,
    #[serde(default = "default_type_version")]
    pub type_version: f64,
    pub display_name: String,
    pub role: NodeRole,
    #[serde(default)]
    pub default_parameters: Map<String, Value>,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub credential_type: Option<String>,
    /// Number of main outputs. Conditions with more than one output branch.
    #[serde(default = "default_outputs")]
    pub outputs: u32,
    /// The node can route failures to a dedicated extra output.
    #[serde(default)]
    pub error_output: bool,
    /// Calls out to a network service and therefore needs an error handler.
    #[serde(default)]
    pub may_fail: bool,
}

impl NodeCatalogEntry {
    pub fn new(node_type: &str, display_name: &str, role: NodeRole) -> Self {
        Self {
            node_type: node_type.to_string(),
            type_version: default_type_version(),
            display_name: display_name.to_string(),
            role,
            default_parameters: Map::new(),
            required_fields: Vec::new(),
            credential_type: None,
            outputs: default_outputs(),
            error_output: false,
            may_fail: false,
        }
    }
}
