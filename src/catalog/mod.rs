//! The node catalog: semantic key -> concrete node definition.

mod defaults;
mod entry;

pub use defaults::{PASS_THROUGH_CODE, standard_entries};
pub use entry::{CredentialReference, NodeCatalogEntry, NodeRole};

use crate::error::ConfigError;
use crate::taxonomy::TriggerType;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable catalog description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Key of the general-purpose node used for unresolvable semantic keys.
    pub fallback: String,
    pub entries: BTreeMap<String, NodeCatalogEntry>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            fallback: "code".to_string(),
            entries: standard_entries(),
        }
    }
}

/// Validated, read-only node catalog.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    entries: AHashMap<String, NodeCatalogEntry>,
    fallback_key: String,
}

impl NodeCatalog {
    /// Checks that every trigger type and the fallback key are present and
    /// that each entry is well formed.
    pub fn compile(settings: CatalogSettings) -> Result<Self, ConfigError> {
        for (key, entry) in &settings.entries {
            let invalid = |message: &str| ConfigError::InvalidCatalogEntry {
                key: key.clone(),
                message: message.to_string(),
            };
            if entry.node_type.trim().is_empty() {
                return Err(invalid("nodeType is empty"));
            }
            if entry.display_name.trim().is_empty() {
                return Err(invalid("displayName is empty"));
            }
            if entry.outputs == 0 {
                return Err(invalid("a node needs at least one output"));
            }
        }

        for trigger in TriggerType::ALL {
            let key = trigger.semantic_key();
            match settings.entries.get(key) {
                None => {
                    return Err(ConfigError::MissingCatalogEntry {
                        key: key.to_string(),
                        reason: "every trigger type needs a node".to_string(),
                    });
                }
                Some(entry) if entry.role != NodeRole::Trigger => {
                    return Err(ConfigError::InvalidCatalogEntry {
                        key: key.to_string(),
                        message: format!("expected role 'trigger', found '{}'", entry.role),
                    });
                }
                Some(_) => {}
            }
        }

        match settings.entries.get(&settings.fallback) {
            None => {
                return Err(ConfigError::MissingCatalogEntry {
                    key: settings.fallback.clone(),
                    reason: "fallback node for unclassified actions".to_string(),
                });
            }
            Some(entry) if entry.role != NodeRole::Action => {
                return Err(ConfigError::InvalidCatalogEntry {
                    key: settings.fallback.clone(),
                    message: format!("fallback must be an action, found '{}'", entry.role),
                });
            }
            Some(_) => {}
        }

        Ok(Self {
            entries: settings.entries.into_iter().collect(),
            fallback_key: settings.fallback,
        })
    }

    pub fn get(&self, key: &str) -> Option<&NodeCatalogEntry> {
        self.entries.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fallback_key(&self) -> &str {
        &self.fallback_key
    }

    pub fn fallback(&self) -> &NodeCatalogEntry {
        // Presence is checked in `compile`.
        &self.entries[&self.fallback_key]
    }

    /// The first entry (by key order) with the given concrete node type.
    pub fn find_by_type(&self, node_type: &str) -> Option<&NodeCatalogEntry> {
        self.entries
            .iter()
            .filter(|(_, e)| e.node_type == node_type)
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, e)| e)
    }

    /// Concrete node types flagged as network-bound.
    pub fn may_fail_types(&self) -> AHashSet<&str> {
        self.entries
            .values()
            .filter(|e| e.may_fail)
            .map(|e| e.node_type.as_str())
            .collect()
    }
}
