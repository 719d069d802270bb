use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The kind of note placed next to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteCategory {
    Start,
    Decision,
    ApiCall,
    DataTransform,
    ErrorHandling,
    Custom(String),
}

impl NoteCategory {
    /// Template-table key.
    pub fn key(&self) -> &str {
        match self {
            NoteCategory::Start => "start",
            NoteCategory::Decision => "decision",
            NoteCategory::ApiCall => "api",
            NoteCategory::DataTransform => "transform",
            NoteCategory::ErrorHandling => "error",
            NoteCategory::Custom(key) => key,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "start" => NoteCategory::Start,
            "decision" => NoteCategory::Decision,
            "api" => NoteCategory::ApiCall,
            "transform" => NoteCategory::DataTransform,
            "error" => NoteCategory::ErrorHandling,
            other => NoteCategory::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values a template can draw on. Unused fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteContext {
    pub purpose: String,
    pub condition: String,
    pub service: String,
    pub action: String,
    pub operation: String,
    pub scenario: String,
    pub description: String,
}

pub type Template = Arc<dyn Fn(&NoteContext) -> String + Send + Sync>;

/// Category key -> note text. Unknown keys use a generic note.
#[derive(Clone)]
pub struct DocumentationTemplates {
    table: AHashMap<String, Template>,
}

impl fmt::Debug for DocumentationTemplates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.table.keys().collect();
        keys.sort();
        f.debug_struct("DocumentationTemplates")
            .field("categories", &keys)
            .finish()
    }
}

impl Default for DocumentationTemplates {
    fn default() -> Self {
        Self::standard()
    }
}

impl DocumentationTemplates {
    pub fn empty() -> Self {
        Self {
            table: AHashMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with_template("start", |ctx| {
                format!(
                    "🚀 WORKFLOW START\n\nPurpose: {}\n\nThis workflow will automatically execute when triggered.",
                    ctx.purpose
                )
            })
            .with_template("decision", |ctx| {
                format!(
                    "🔀 DECISION POINT\n\nCondition: {}\n\nThe workflow branches based on this condition.",
                    ctx.condition
                )
            })
            .with_template("api", |ctx| {
                format!(
                    "🌐 API CALL\n\nService: {}\nAction: {}\n\nConnecting to external service.",
                    ctx.service, ctx.action
                )
            })
            .with_template("transform", |ctx| {
                format!(
                    "🔄 DATA TRANSFORMATION\n\nOperation: {}\n\nProcessing and transforming data.",
                    ctx.operation
                )
            })
            .with_template("error", |ctx| {
                format!(
                    "⚠️ ERROR HANDLING\n\nScenario: {}\n\nHandles errors gracefully.",
                    ctx.scenario
                )
            })
    }

    /// Registers or replaces the template for a category key.
    pub fn with_template<F>(mut self, key: &str, template: F) -> Self
    where
        F: Fn(&NoteContext) -> String + Send + Sync + 'static,
    {
        self.table.insert(key.to_string(), Arc::new(template));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn render(&self, category: &NoteCategory, ctx: &NoteContext) -> String {
        match self.table.get(category.key()) {
            Some(template) => template(ctx),
            None => Self::generic(category.key(), &ctx.description),
        }
    }

    fn generic(key: &str, description: &str) -> String {
        let body = if description.trim().is_empty() {
            "Additional workflow step"
        } else {
            description
        };
        format!("📝 {}\n\n{}", key.to_uppercase(), body)
    }

    /// One-sentence summary of the whole workflow.
    pub fn describe(&self, purpose: &str, trigger: &str, outcome: &str) -> String {
        format!(
            "This workflow {}. It is triggered {} and results in {}.",
            purpose, trigger, outcome
        )
    }
}

/// Size and colour of generated notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentationSettings {
    /// Category key -> colour.
    pub colors: BTreeMap<String, String>,
    pub default_color: String,
    pub note_width: u32,
    pub note_height: u32,
}

impl Default for DocumentationSettings {
    fn default() -> Self {
        let colors = [
            ("start", "#FFD700"),
            ("decision", "#FF6B6B"),
            ("api", "#4ECDC4"),
            ("transform", "#45B7D1"),
            ("error", "#FFA07A"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            colors,
            default_color: "#D3D3D3".to_string(),
            note_width: 240,
            note_height: 160,
        }
    }
}

impl DocumentationSettings {
    pub fn color_for(&self, key: &str) -> &str {
        self.colors
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}
