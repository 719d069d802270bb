use serde::Serialize;
use std::fmt;

/// Kinds of soft findings. None of them stop a graph from being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Nothing in the description matched the vocabulary.
    UnclassifiedInput,
    /// No action was mentioned, so one was synthesized from the primary action.
    DefaultAction,
    /// A semantic key had no catalog entry and fell back to the generic node.
    UnresolvedKey,
    /// A caller override targeted a semantic key that was not resolved.
    UnusedOverride,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnclassifiedInput => "unclassifiedInput",
            DiagnosticKind::DefaultAction => "defaultAction",
            DiagnosticKind::UnresolvedKey => "unresolvedKey",
            DiagnosticKind::UnusedOverride => "unusedOverride",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
