use thiserror::Error;

/// Errors raised while loading or compiling a configuration bundle.
///
/// These are the only hard failures of the generation pipeline. Anything that
/// can be discovered from the description text alone degrades to a
/// diagnostic in the `ValidationReport` instead.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse configuration JSON: {0}")]
    JsonParseError(String),

    #[error("Pattern '{pattern}' for '{owner}' is not a valid regular expression: {message}")]
    InvalidPattern {
        owner: String,
        pattern: String,
        message: String,
    },

    #[error("Node catalog has no entry for mandatory key '{key}' ({reason})")]
    MissingCatalogEntry { key: String, reason: String },

    #[error("Catalog entry '{key}' is malformed: {message}")]
    InvalidCatalogEntry { key: String, message: String },

    #[error("Error handling policy refers to unknown failure pattern '{0}'")]
    UnknownFailurePattern(String),

    #[error("Layout setting '{setting}' must be positive, found {value}")]
    InvalidLayout { setting: String, value: i64 },

    #[error("Quality thresholds are inverted: minimumNodes ({minimum}) > maximumNodes ({maximum})")]
    InvertedNodeRange { minimum: usize, maximum: usize },
}

/// Errors that can occur while moving a `WorkflowGraph` in or out of JSON.
#[derive(Error, Debug, Clone)]
pub enum GraphIoError {
    #[error("Failed to serialize workflow graph: {0}")]
    Serialize(String),

    #[error("Failed to parse workflow graph JSON: {0}")]
    Parse(String),

    #[error("Workflow JSON is missing required property '{0}'")]
    MissingProperty(String),
}
