use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Node template attached downstream of an action that may fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailurePattern {
    pub node_type: String,
    #[serde(default = "default_version")]
    pub type_version: f64,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

fn default_version() -> f64 {
    1.0
}

/// Which failure pattern to use, and whether to plan error handlers at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorHandlingPolicy {
    pub enabled: bool,
    /// Key into `patterns`.
    pub pattern: String,
    pub patterns: BTreeMap<String, FailurePattern>,
    /// `onError` value set on nodes whose failures are routed to the error output.
    pub error_output_mode: String,
}

fn pattern(node_type: &str, parameters: Value) -> FailurePattern {
    FailurePattern {
        node_type: node_type.to_string(),
        type_version: default_version(),
        parameters: match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

impl Default for ErrorHandlingPolicy {
    fn default() -> Self {
        let mut patterns = BTreeMap::new();
        patterns.insert(
            "apiFailure".to_string(),
            pattern(
                "n8n-nodes-base.noOp",
                json!({ "notice": "API call failed - continuing with default values" }),
            ),
        );
        patterns.insert(
            "dataValidation".to_string(),
            pattern(
                "n8n-nodes-base.if",
                json!({
                    "conditions": {
                        "string": [{ "value1": "={{$json.data}}", "operation": "isNotEmpty" }]
                    }
                }),
            ),
        );
        patterns.insert(
            "timeout".to_string(),
            pattern(
                "n8n-nodes-base.httpRequest",
                json!({ "timeout": 30000, "continueOnFail": true }),
            ),
        );
        Self {
            enabled: true,
            pattern: "apiFailure".to_string(),
            patterns,
            error_output_mode: "continueErrorOutput".to_string(),
        }
    }
}

impl ErrorHandlingPolicy {
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        if self.patterns.contains_key(&self.pattern) {
            Ok(())
        } else {
            Err(ConfigError::UnknownFailurePattern(self.pattern.clone()))
        }
    }

    /// The selected failure pattern. Presence is checked when the config is compiled.
    pub fn failure_pattern(&self) -> Option<&FailurePattern> {
        self.patterns.get(&self.pattern)
    }
}
