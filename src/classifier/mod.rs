//! Text classification: the lexical front end of the generator.
//!
//! A [`Classifier`] turns a free-form description into a
//! [`ClassificationResult`]. The only built-in strategy is the
//! [`KeywordClassifier`], which works purely from keyword tables and regexes;
//! a richer classifier can be substituted without touching the resolver,
//! builder or validator.

mod keyword;

pub use keyword::KeywordClassifier;

use crate::taxonomy::TriggerType;
use serde::Serialize;

/// A classification strategy.
///
/// Implementations must be pure: the same text always yields the same result,
/// and classification never fails. Unrecognisable input produces defaults.
pub trait Classifier: Send + Sync {
    fn classify(&self, description: &str) -> ClassificationResult;
}

/// One action verb found in the text, with the service named in its clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMention {
    pub verb: String,
    /// The service token as written (e.g. `"api"`).
    pub service: Option<String>,
    /// The semantic key the service token maps to (e.g. `"http_request"`).
    pub service_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleInterval {
    EveryHour,
    EveryDay,
    EveryWeek,
    EveryMonth,
}

impl ScheduleInterval {
    /// The `mode` value understood by the cron trigger node.
    pub fn mode(&self) -> &'static str {
        match self {
            ScheduleInterval::EveryHour => "everyHour",
            ScheduleInterval::EveryDay => "everyDay",
            ScheduleInterval::EveryWeek => "everyWeek",
            ScheduleInterval::EveryMonth => "everyMonth",
        }
    }
}

/// Timing details pulled out of a schedule-style description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleHint {
    pub interval: ScheduleInterval,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
}

/// Literal values found in the text that can pre-fill node parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub urls: Vec<String>,
    pub emails: Vec<String>,
}

/// The outcome of classifying a description. Derived and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub trigger: TriggerType,
    /// First entry of the action priority list present in the text.
    pub primary_action: String,
    /// Every action mention in text order.
    pub actions: Vec<ActionMention>,
    pub trigger_keywords: Vec<String>,
    /// Condition keywords found, in order of first appearance.
    pub conditions: Vec<String>,
    /// Data-operation keywords found, in order of first appearance.
    pub data_ops: Vec<String>,
    pub schedule: Option<ScheduleHint>,
    pub entities: Entities,
}

impl ClassificationResult {
    /// True when nothing in the text matched the vocabulary.
    pub fn is_unclassified(&self) -> bool {
        self.actions.is_empty()
            && self.trigger_keywords.is_empty()
            && self.conditions.is_empty()
            && self.data_ops.is_empty()
    }
}
