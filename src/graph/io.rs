use super::model::WorkflowGraph;
use crate::catalog::NodeRole;
use crate::error::GraphIoError;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

const REQUIRED_PROPERTIES: [&str; 4] = ["name", "nodes", "connections", "settings"];

impl WorkflowGraph {
    /// Serializes with the given indentation width, keeping the property order
    /// `name, nodes, connections, active, settings, tags`.
    pub fn to_json(&self, indent: usize) -> Result<String, GraphIoError> {
        let indent = " ".repeat(indent);
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| GraphIoError::Serialize(e.to_string()))?;
        String::from_utf8(out).map_err(|e| GraphIoError::Serialize(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphIoError> {
        self.to_json(2)
    }

    pub fn to_value(&self) -> Result<Value, GraphIoError> {
        serde_json::to_value(self).map_err(|e| GraphIoError::Serialize(e.to_string()))
    }

    /// Parses a workflow document. Node roles are not stored, so they are
    /// recovered from the node types.
    pub fn from_json(json: &str) -> Result<Self, GraphIoError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| GraphIoError::Parse(e.to_string()))?;
        let Some(object) = value.as_object() else {
            return Err(GraphIoError::Parse(
                "top-level value is not an object".to_string(),
            ));
        };
        if let Some(missing) = REQUIRED_PROPERTIES
            .iter()
            .find(|property| !object.contains_key(**property))
        {
            return Err(GraphIoError::MissingProperty(missing.to_string()));
        }

        let mut graph: WorkflowGraph =
            serde_json::from_value(value).map_err(|e| GraphIoError::Parse(e.to_string()))?;
        for node in &mut graph.nodes {
            node.spec.role = NodeRole::infer_from_type(&node.spec.node_type);
            if node.spec.on_error.is_some() {
                node.spec.error_output = true;
            }
        }
        Ok(graph)
    }
}
