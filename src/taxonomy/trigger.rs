use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of event that starts a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerType {
    Schedule,
    Webhook,
    Email,
    Form,
    Manual,
}

impl TriggerType {
    /// Every trigger type, in declaration order.
    pub const ALL: [TriggerType; 5] = [
        TriggerType::Schedule,
        TriggerType::Webhook,
        TriggerType::Email,
        TriggerType::Form,
        TriggerType::Manual,
    ];

    /// The semantic key under which the node catalog stores this trigger.
    pub fn semantic_key(&self) -> &'static str {
        match self {
            TriggerType::Schedule => "schedule",
            TriggerType::Webhook => "webhook",
            TriggerType::Email => "email",
            TriggerType::Form => "form",
            TriggerType::Manual => "manual",
        }
    }

    /// Phrase used by the workflow description ("It is triggered ...").
    pub fn phrase(&self) -> &'static str {
        match self {
            TriggerType::Schedule => "on a schedule",
            TriggerType::Webhook => "by an incoming webhook call",
            TriggerType::Email => "by an incoming email",
            TriggerType::Form => "by a form submission",
            TriggerType::Manual => "manually",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.semantic_key())
    }
}

/// A trigger type paired with the compiled, case-insensitive pattern that selects it.
#[derive(Debug, Clone)]
pub struct TriggerPattern {
    pub trigger: TriggerType,
    pub regex: Regex,
}

impl TriggerPattern {
    pub fn matches(&self, description: &str) -> bool {
        self.regex.is_match(description)
    }
}
