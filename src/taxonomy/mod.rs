//! Keyword vocabulary used by the keyword classifier.
//!
//! [`TaxonomySettings`] is plain data that can be loaded from JSON; [`Taxonomy`]
//! is its compiled form (regexes built, lookup tables hashed). Both are
//! immutable once built and are passed by value into the classifier.

mod trigger;

pub use trigger::{TriggerPattern, TriggerType};

use crate::error::ConfigError;
use ahash::AHashMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The semantic categories the vocabulary is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Trigger,
    Action,
    Condition,
    DataOp,
}

/// A trigger type and the raw pattern text that selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPatternSettings {
    pub trigger: TriggerType,
    pub pattern: String,
}

/// Serializable taxonomy description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxonomySettings {
    pub trigger_keywords: Vec<String>,
    pub action_keywords: Vec<String>,
    pub condition_keywords: Vec<String>,
    pub data_op_keywords: Vec<String>,
    /// Ordered list scanned for the primary action. Order is part of the contract.
    pub action_priority: Vec<String>,
    pub default_action: String,
    /// Evaluated in order; the first match wins.
    pub trigger_patterns: Vec<TriggerPatternSettings>,
    pub default_trigger: TriggerType,
    /// Service token -> semantic key.
    pub services: BTreeMap<String, String>,
    /// Action verb -> semantic key used when no service is named.
    pub verb_defaults: BTreeMap<String, String>,
    /// Condition keyword -> semantic key.
    pub condition_keys: BTreeMap<String, String>,
    pub url_pattern: String,
    pub email_pattern: String,
    /// Clock time following "at", e.g. `at 9am` or `at 17:30`.
    pub time_pattern: String,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn pairs(list: &[(&str, &str)]) -> BTreeMap<String, String> {
    list.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for TaxonomySettings {
    fn default() -> Self {
        let pattern = |trigger, pattern: &str| TriggerPatternSettings {
            trigger,
            pattern: pattern.to_string(),
        };
        Self {
            trigger_keywords: words(&[
                "when", "if", "trigger", "start", "schedule", "webhook", "email", "form",
            ]),
            action_keywords: words(&[
                "send",
                "create",
                "update",
                "delete",
                "fetch",
                "process",
                "transform",
                "notify",
            ]),
            condition_keywords: words(&[
                "if", "when", "condition", "filter", "check", "validate", "switch",
            ]),
            data_op_keywords: words(&["transform", "map", "merge", "split", "aggregate", "format"]),
            action_priority: words(&["send", "create", "update", "delete", "process", "transform"]),
            default_action: "process".to_string(),
            trigger_patterns: vec![
                pattern(TriggerType::Schedule, "every|daily|hourly|weekly|monthly"),
                pattern(TriggerType::Webhook, "webhook|api|http|post|receive"),
                pattern(TriggerType::Email, "email|mail|message"),
                pattern(TriggerType::Manual, "manual|button|click|start"),
            ],
            default_trigger: TriggerType::Manual,
            services: pairs(&[
                ("email", "send_email"),
                ("mail", "send_email"),
                ("gmail", "send_email"),
                ("smtp", "send_email"),
                ("slack", "slack"),
                ("discord", "discord"),
                ("openai", "openai"),
                ("gpt", "openai"),
                ("chatgpt", "openai"),
                ("ai", "openai"),
                ("llm", "openai"),
                ("database", "database"),
                ("db", "database"),
                ("postgres", "database"),
                ("postgresql", "database"),
                ("sql", "database"),
                ("api", "http_request"),
                ("http", "http_request"),
                ("https", "http_request"),
                ("url", "http_request"),
                ("endpoint", "http_request"),
                ("rest", "http_request"),
                ("code", "code"),
                ("script", "code"),
                ("javascript", "code"),
            ]),
            verb_defaults: pairs(&[("fetch", "http_request"), ("notify", "send_email")]),
            condition_keys: pairs(&[
                ("if", "condition"),
                ("when", "condition"),
                ("condition", "condition"),
                ("filter", "filter"),
                ("check", "condition"),
                ("validate", "condition"),
                ("switch", "switch"),
            ]),
            url_pattern: r#"https?://[^\s"'<>]+[^\s"'<>.,;:!?)]"#.to_string(),
            email_pattern: r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}".to_string(),
            time_pattern: r"\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b".to_string(),
        }
    }
}

/// Compiled, immutable keyword taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    trigger_keywords: Vec<String>,
    action_keywords: Vec<String>,
    condition_keywords: Vec<String>,
    data_op_keywords: Vec<String>,
    action_priority: Vec<String>,
    default_action: String,
    trigger_patterns: Vec<TriggerPattern>,
    default_trigger: TriggerType,
    services: AHashMap<String, String>,
    verb_defaults: AHashMap<String, String>,
    condition_keys: AHashMap<String, String>,
    url_regex: Regex,
    email_regex: Regex,
    time_regex: Regex,
}

fn compile_pattern(owner: &str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            owner: owner.to_string(),
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

impl Taxonomy {
    /// Compiles the settings, failing on the first invalid pattern.
    pub fn compile(settings: TaxonomySettings) -> Result<Self, ConfigError> {
        let trigger_patterns = settings
            .trigger_patterns
            .iter()
            .map(|p| {
                compile_pattern(&format!("trigger '{}'", p.trigger), &p.pattern).map(|regex| {
                    TriggerPattern {
                        trigger: p.trigger,
                        regex,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let url_regex = compile_pattern("url entity", &settings.url_pattern)?;
        let email_regex = compile_pattern("email entity", &settings.email_pattern)?;
        let time_regex = compile_pattern("schedule time", &settings.time_pattern)?;

        let lower = |list: Vec<String>| -> Vec<String> {
            list.into_iter().map(|w| w.to_lowercase()).collect()
        };
        let lower_map = |map: BTreeMap<String, String>| -> AHashMap<String, String> {
            map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
        };

        Ok(Self {
            trigger_keywords: lower(settings.trigger_keywords),
            action_keywords: lower(settings.action_keywords),
            condition_keywords: lower(settings.condition_keywords),
            data_op_keywords: lower(settings.data_op_keywords),
            action_priority: lower(settings.action_priority),
            default_action: settings.default_action.to_lowercase(),
            trigger_patterns,
            default_trigger: settings.default_trigger,
            services: lower_map(settings.services),
            verb_defaults: lower_map(settings.verb_defaults),
            condition_keys: lower_map(settings.condition_keys),
            url_regex,
            email_regex,
            time_regex,
        })
    }

    pub fn keywords(&self, category: KeywordCategory) -> &[String] {
        match category {
            KeywordCategory::Trigger => &self.trigger_keywords,
            KeywordCategory::Action => &self.action_keywords,
            KeywordCategory::Condition => &self.condition_keywords,
            KeywordCategory::DataOp => &self.data_op_keywords,
        }
    }

    pub fn is_keyword(&self, category: KeywordCategory, token: &str) -> bool {
        self.keywords(category).iter().any(|k| k == token)
    }

    pub fn action_priority(&self) -> &[String] {
        &self.action_priority
    }

    pub fn default_action(&self) -> &str {
        &self.default_action
    }

    pub fn trigger_patterns(&self) -> &[TriggerPattern] {
        &self.trigger_patterns
    }

    pub fn default_trigger(&self) -> TriggerType {
        self.default_trigger
    }

    /// Semantic key of a service token (e.g. `"slack"` -> `"slack"`, `"api"` -> `"http_request"`).
    pub fn service_key(&self, token: &str) -> Option<&str> {
        self.services.get(token).map(String::as_str)
    }

    pub fn verb_default(&self, verb: &str) -> Option<&str> {
        self.verb_defaults.get(verb).map(String::as_str)
    }

    /// Semantic key of a condition keyword; unmapped keywords resolve to `"condition"`.
    pub fn condition_key<'a>(&'a self, keyword: &'a str) -> &'a str {
        self.condition_keys
            .get(keyword)
            .map(String::as_str)
            .unwrap_or("condition")
    }

    pub fn url_regex(&self) -> &Regex {
        &self.url_regex
    }

    pub fn email_regex(&self) -> &Regex {
        &self.email_regex
    }

    pub fn time_regex(&self) -> &Regex {
        &self.time_regex
    }
}
