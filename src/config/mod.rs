//! The configuration bundle.
//!
//! [`GeneratorSettings`] is the serializable form, loaded from JSON or built
//! from defaults. [`GeneratorConfig::from_settings`] validates it and compiles
//! every table up front, so a malformed bundle fails before any graph exists.

mod naming;
mod policy;
mod quality;

pub use naming::{NamingRules, NamingSettings, title_case};
pub use policy::{ErrorHandlingPolicy, FailurePattern};
pub use quality::QualityThresholds;

use crate::catalog::{CatalogSettings, NodeCatalog};
use crate::docs::{DocumentationSettings, DocumentationTemplates};
use crate::error::ConfigError;
use crate::graph::LayoutConfig;
use crate::taxonomy::{Taxonomy, TaxonomySettings};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Top-level workflow fields that do not depend on the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowDefaults {
    pub active: bool,
    pub execution_order: String,
    pub tags: BTreeSet<String>,
}

impl Default for WorkflowDefaults {
    fn default() -> Self {
        Self {
            active: false,
            execution_order: "v1".to_string(),
            tags: ["generated", "text-description"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    pub json_indentation: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json_indentation: 2,
        }
    }
}

/// Everything the generator can be configured with, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub taxonomy: TaxonomySettings,
    pub catalog: CatalogSettings,
    pub layout: LayoutConfig,
    pub quality: QualityThresholds,
    pub error_handling: ErrorHandlingPolicy,
    pub naming: NamingSettings,
    pub documentation: DocumentationSettings,
    pub workflow: WorkflowDefaults,
    /// Credential types the runtime knows how to resolve.
    pub recognized_credentials: Vec<String>,
    pub output: OutputSettings,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomySettings::default(),
            catalog: CatalogSettings::default(),
            layout: LayoutConfig::default(),
            quality: QualityThresholds::default(),
            error_handling: ErrorHandlingPolicy::default(),
            naming: NamingSettings::default(),
            documentation: DocumentationSettings::default(),
            workflow: WorkflowDefaults::default(),
            recognized_credentials: [
                "openAiApi",
                "slackApi",
                "discordWebhookApi",
                "postgres",
                "smtp",
                "imap",
                "httpHeaderAuth",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            output: OutputSettings::default(),
        }
    }
}

/// Validated, compiled configuration. Immutable and cheap to share by reference.
#[derive(Clone)]
pub struct GeneratorConfig {
    taxonomy: Taxonomy,
    catalog: NodeCatalog,
    layout: LayoutConfig,
    quality: QualityThresholds,
    error_handling: ErrorHandlingPolicy,
    naming: NamingRules,
    documentation: DocumentationSettings,
    templates: DocumentationTemplates,
    workflow: WorkflowDefaults,
    recognized_credentials: AHashSet<String>,
    output: OutputSettings,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("catalog_entries", &self.catalog.len())
            .field("layout", &self.layout)
            .field("quality", &self.quality)
            .field("error_handling", &self.error_handling.pattern)
            .finish_non_exhaustive()
    }
}

impl GeneratorConfig {
    pub fn from_settings(settings: GeneratorSettings) -> Result<Self, ConfigError> {
        settings.layout.check()?;
        if settings.quality.minimum_nodes > settings.quality.maximum_nodes {
            return Err(ConfigError::InvertedNodeRange {
                minimum: settings.quality.minimum_nodes,
                maximum: settings.quality.maximum_nodes,
            });
        }
        settings.error_handling.check()?;

        let taxonomy = Taxonomy::compile(settings.taxonomy)?;
        let catalog = NodeCatalog::compile(settings.catalog)?;
        let naming = NamingRules::compile(settings.naming)?;
        debug!(catalog_entries = catalog.len(), "compiled generator configuration");

        Ok(Self {
            taxonomy,
            catalog,
            layout: settings.layout,
            quality: settings.quality,
            error_handling: settings.error_handling,
            naming,
            documentation: settings.documentation,
            templates: DocumentationTemplates::standard(),
            workflow: settings.workflow,
            recognized_credentials: settings.recognized_credentials.into_iter().collect(),
            output: settings.output,
        })
    }

    /// The built-in n8n-oriented bundle.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_settings(GeneratorSettings::default())
    }

    /// Parses settings from JSON. Missing sections fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: GeneratorSettings =
            serde_json::from_str(json).map_err(|e| ConfigError::JsonParseError(e.to_string()))?;
        Self::from_settings(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Replaces the documentation template table.
    pub fn with_templates(mut self, templates: DocumentationTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn quality(&self) -> &QualityThresholds {
        &self.quality
    }

    pub fn error_handling(&self) -> &ErrorHandlingPolicy {
        &self.error_handling
    }

    pub fn naming(&self) -> &NamingRules {
        &self.naming
    }

    pub fn documentation(&self) -> &DocumentationSettings {
        &self.documentation
    }

    pub fn templates(&self) -> &DocumentationTemplates {
        &self.templates
    }

    pub fn workflow(&self) -> &WorkflowDefaults {
        &self.workflow
    }

    pub fn is_recognized_credential(&self, credential_type: &str) -> bool {
        self.recognized_credentials.contains(credential_type)
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }
}
