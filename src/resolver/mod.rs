//! Semantic resolution: classification -> concrete node specs.
//!
//! The resolver never fails. Keys without a catalog entry fall back to the
//! generic processing node and leave a [`Diagnostic`]; required fields that
//! stay empty after merging are recorded on the spec for the validation
//! pipeline to report.

mod diagnostic;
mod merge;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use merge::{is_present, merge_parameters, missing_fields};

use crate::catalog::{CredentialReference, NodeCatalog, NodeCatalogEntry, NodeRole};
use crate::classifier::{ActionMention, ClassificationResult, ScheduleHint, ScheduleInterval};
use crate::config::{ErrorHandlingPolicy, GeneratorConfig, title_case};
use crate::taxonomy::{KeywordCategory, Taxonomy};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Caller-supplied parameters, keyed by semantic key (e.g. `"send_email"`).
pub type ParameterOverrides = AHashMap<String, Map<String, Value>>;

fn default_version() -> f64 {
    1.0
}

fn default_outputs() -> u32 {
    1
}

/// A resolved node before it is given an id and a position.
///
/// Only the fields the runtime understands are serialized; the rest is
/// bookkeeping for the builder, the documentation synthesizer and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub type_version: f64,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, CredentialReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<String>,

    #[serde(skip)]
    pub role: NodeRole,
    #[serde(skip)]
    pub semantic_key: String,
    #[serde(skip)]
    pub required_fields: Vec<String>,
    #[serde(skip)]
    pub missing_fields: Vec<String>,
    #[serde(skip, default = "default_outputs")]
    pub outputs: u32,
    #[serde(skip)]
    pub error_output: bool,
    #[serde(skip)]
    pub may_fail: bool,
    /// Short phrase describing what the node is for, used in annotations.
    #[serde(skip)]
    pub intent: String,
    /// External service the node talks to, if any.
    #[serde(skip)]
    pub service: Option<String>,
    /// For error handlers: index of the spec whose failures this node handles.
    #[serde(skip)]
    pub guards: Option<usize>,
    /// Built from the generic fallback entry because the key was unknown.
    #[serde(skip)]
    pub fallback: bool,
}

impl NodeSpec {
    /// A spec carrying an entry's defaults, before any merging.
    pub fn from_entry(semantic_key: &str, entry: &NodeCatalogEntry) -> Self {
        let credentials = entry
            .credential_type
            .iter()
            .map(|credential| {
                (
                    credential.clone(),
                    CredentialReference {
                        name: credential.clone(),
                    },
                )
            })
            .collect();

        Self {
            name: entry.display_name.clone(),
            node_type: entry.node_type.clone(),
            type_version: entry.type_version,
            parameters: entry.default_parameters.clone(),
            credentials,
            on_error: None,
            role: entry.role,
            semantic_key: semantic_key.to_string(),
            required_fields: entry.required_fields.clone(),
            missing_fields: Vec::new(),
            outputs: entry.outputs,
            error_output: entry.error_output,
            may_fail: entry.may_fail,
            intent: String::new(),
            service: None,
            guards: None,
            fallback: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Output of [`NodeResolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Specs in role order: trigger, actions, conditions, data-ops, error handlers.
    pub specs: Vec<NodeSpec>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn with_role(&self, role: NodeRole) -> impl Iterator<Item = &NodeSpec> {
        self.specs.iter().filter(move |s| s.role == role)
    }

    pub fn unresolved_keys(&self) -> impl Iterator<Item = &str> {
        self.specs
            .iter()
            .filter(|s| s.fallback)
            .map(|s| s.semantic_key.as_str())
    }
}

/// A spec waiting for its text-derived parameters to be merged.
struct Pending {
    spec: NodeSpec,
    from_text: Map<String, Value>,
}

impl Pending {
    fn new(spec: NodeSpec) -> Self {
        Self {
            spec,
            from_text: Map::new(),
        }
    }
}

/// Maps classified intents onto catalog entries.
pub struct NodeResolver<'a> {
    taxonomy: &'a Taxonomy,
    catalog: &'a NodeCatalog,
    policy: &'a ErrorHandlingPolicy,
}

impl<'a> NodeResolver<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            taxonomy: config.taxonomy(),
            catalog: config.catalog(),
            policy: config.error_handling(),
        }
    }

    /// Resolves a classification into ordered node specs.
    ///
    /// `services` are extra services named by the caller; each one becomes an
    /// action unless its key is already present.
    pub fn resolve(
        &self,
        classification: &ClassificationResult,
        overrides: &ParameterOverrides,
        services: &[String],
    ) -> Resolution {
        let mut diagnostics = Vec::new();
        if classification.is_unclassified() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnclassifiedInput,
                format!(
                    "no keywords recognised; defaulting to a {} trigger and '{}'",
                    classification.trigger, classification.primary_action
                ),
            ));
        }

        let mut seen: AHashSet<String> = AHashSet::new();
        let mut pending: Vec<Pending> = Vec::new();

        // Trigger
        let trigger_key = classification.trigger.semantic_key();
        let mut trigger = Pending::new(self.lookup(trigger_key, NodeRole::Trigger, &mut diagnostics));
        trigger.spec.intent = format!("run {}", classification.trigger.phrase());
        if let Some(hint) = &classification.schedule {
            trigger
                .from_text
                .insert("triggerTimes".to_string(), trigger_times(hint));
        }
        seen.insert(trigger_key.to_string());
        pending.push(trigger);

        // Actions
        let mut action_count = 0;
        for mention in &classification.actions {
            let Some(key) = self.action_key(mention) else {
                continue;
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            let mut action = Pending::new(self.lookup(&key, NodeRole::Action, &mut diagnostics));
            action.spec.intent = mention.verb.clone();
            pending.push(action);
            action_count += 1;
        }

        for service in services {
            let token = service.trim().to_lowercase();
            if token.is_empty() {
                continue;
            }
            let key = self
                .taxonomy
                .service_key(&token)
                .map(str::to_string)
                .unwrap_or(token);
            if !seen.insert(key.clone()) {
                continue;
            }
            let mut action = Pending::new(self.lookup(&key, NodeRole::Action, &mut diagnostics));
            action.spec.intent = "call".to_string();
            pending.push(action);
            action_count += 1;
        }

        if action_count == 0 {
            let primary = classification.primary_action.as_str();
            let mut key = self
                .taxonomy
                .verb_default(primary)
                .unwrap_or(primary)
                .to_string();
            // A primary action like "transform" names a data operation, not an action node.
            if self.catalog.get(&key).is_some_and(|e| e.role != NodeRole::Action) {
                key = self.taxonomy.default_action().to_string();
            }
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DefaultAction,
                format!("no action mentioned; synthesized '{}' from primary action '{}'", key, primary),
            ));
            seen.insert(key.clone());
            let mut action = Pending::new(self.lookup(&key, NodeRole::Action, &mut diagnostics));
            action.spec.intent = primary.to_string();
            pending.push(action);
        }

        // Conditions
        for keyword in &classification.conditions {
            let key = self.taxonomy.condition_key(keyword).to_string();
            if !seen.insert(key.clone()) {
                continue;
            }
            let mut condition = Pending::new(self.lookup(&key, NodeRole::Condition, &mut diagnostics));
            condition.spec.intent = keyword.clone();
            pending.push(condition);
        }

        // Data operations
        for keyword in &classification.data_ops {
            if !seen.insert(keyword.clone()) {
                continue;
            }
            let mut op = Pending::new(self.lookup(keyword, NodeRole::DataOp, &mut diagnostics));
            op.spec.intent = keyword.clone();
            pending.push(op);
        }

        self.assign_entities(classification, &mut pending);

        let mut specs: Vec<NodeSpec> = pending
            .into_iter()
            .map(|p| {
                let mut spec = p.spec;
                merge_parameters(&mut spec.parameters, &p.from_text);
                if let Some(layer) = overrides.get(&spec.semantic_key) {
                    merge_parameters(&mut spec.parameters, layer);
                }
                spec.missing_fields = missing_fields(&spec.parameters, &spec.required_fields);
                spec
            })
            .collect();

        let mut unused: Vec<&String> = overrides.keys().filter(|k| !seen.contains(*k)).collect();
        unused.sort();
        for key in unused {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnusedOverride,
                format!("parameters supplied for '{}' but no such node was resolved", key),
            ));
        }

        let handlers = self.error_handlers(&specs);
        specs.extend(handlers);

        debug!(
            nodes = specs.len(),
            diagnostics = diagnostics.len(),
            "resolved node specs"
        );
        Resolution { specs, diagnostics }
    }

    /// Semantic key of an action mention, or `None` when the verb is really a data operation.
    fn action_key(&self, mention: &ActionMention) -> Option<String> {
        if let Some(key) = &mention.service_key {
            return Some(key.clone());
        }
        if self.taxonomy.is_keyword(KeywordCategory::DataOp, &mention.verb) {
            return None;
        }
        Some(
            self.taxonomy
                .verb_default(&mention.verb)
                .unwrap_or(&mention.verb)
                .to_string(),
        )
    }

    fn lookup(&self, key: &str, role: NodeRole, diagnostics: &mut Vec<Diagnostic>) -> NodeSpec {
        if let Some(entry) = self.catalog.get(key) {
            let mut spec = NodeSpec::from_entry(key, entry);
            if entry.credential_type.is_some() || entry.may_fail {
                spec.service = Some(entry.display_name.clone());
            }
            return spec;
        }

        warn!(key, fallback = self.catalog.fallback_key(), "unresolved semantic key");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnresolvedKey,
            format!(
                "no catalog entry for '{}'; using the generic '{}' node",
                key,
                self.catalog.fallback_key()
            ),
        ));

        let mut spec = NodeSpec::from_entry(key, self.catalog.fallback());
        let name = title_case(key);
        if !name.is_empty() {
            spec.name = name;
        }
        spec.role = role;
        spec.fallback = true;
        spec
    }

    /// Hands extracted URLs and e-mail addresses to the nodes that need them, in order.
    fn assign_entities(&self, classification: &ClassificationResult, pending: &mut [Pending]) {
        let entities = &classification.entities;
        for (field, values) in [("url", &entities.urls), ("toEmail", &entities.emails)] {
            let mut values = values.iter();
            for p in pending
                .iter_mut()
                .filter(|p| p.spec.required_fields.iter().any(|f| f == field))
            {
                match values.next() {
                    Some(value) => {
                        p.from_text
                            .insert(field.to_string(), Value::String(value.clone()));
                    }
                    None => break,
                }
            }
        }
    }

    fn error_handlers(&self, specs: &[NodeSpec]) -> Vec<NodeSpec> {
        if !self.policy.enabled {
            return Vec::new();
        }
        let Some(pattern) = self.policy.failure_pattern() else {
            return Vec::new();
        };

        specs
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.may_fail)
            .map(|(index, spec)| {
                let mut handler = NodeSpec::from_entry(
                    "error_handler",
                    &NodeCatalogEntry::new(
                        &pattern.node_type,
                        &format!("{} Fallback", spec.name),
                        NodeRole::ErrorHandler,
                    ),
                );
                handler.type_version = pattern.type_version;
                handler.parameters = pattern.parameters.clone();
                handler.intent = format!("{} fails", spec.name);
                handler.guards = Some(index);
                handler
            })
            .collect()
    }
}

/// `triggerTimes` parameter for a cron node.
fn trigger_times(hint: &ScheduleHint) -> Value {
    let mut item = Map::new();
    item.insert("mode".to_string(), json!(hint.interval.mode()));
    if hint.interval != ScheduleInterval::EveryHour {
        if let Some(hour) = hint.hour {
            item.insert("hour".to_string(), json!(hour));
        }
    }
    if let Some(minute) = hint.minute {
        item.insert("minute".to_string(), json!(minute));
    }
    json!({ "item": [Value::Object(item)] })
}
