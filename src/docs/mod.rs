//! Documentation synthesis.
//!
//! The synthesizer reads a finished graph and decides which notes to write
//! and where they belong. It never touches the graph; placing the notes is
//! left to [`GraphBuilder::attach_documentation`](crate::graph::GraphBuilder::attach_documentation).

mod templates;

pub use templates::{
    DocumentationSettings, DocumentationTemplates, NoteCategory, NoteContext, Template,
};

use crate::catalog::{NodeCatalogEntry, NodeRole};
use crate::config::GeneratorConfig;
use crate::graph::{PlacedNode, WorkflowGraph};
use crate::taxonomy::TriggerType;
use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;

/// A caller-supplied note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomNote {
    /// Category key. Unknown keys get the generic template.
    pub category: String,
    pub description: String,
    /// Name of the node the note belongs to.
    pub anchor: Option<String>,
}

/// What the synthesizer knows beyond the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentationContext {
    pub purpose: String,
    pub outcome: String,
    /// Inferred from the trigger node when absent.
    pub trigger: Option<TriggerType>,
    pub notes: Vec<CustomNote>,
}

/// One note to be placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSpec {
    /// Id of the node the note sits above; `None` for free-standing notes.
    pub anchor: Option<String>,
    pub category: NoteCategory,
    pub content: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Documentation {
    pub notes: Vec<AnnotationSpec>,
    pub description: String,
}

pub struct DocumentationSynthesizer<'a> {
    config: &'a GeneratorConfig,
}

fn or_name<'n>(text: &'n str, node: &'n PlacedNode) -> &'n str {
    if text.is_empty() { node.name() } else { text }
}

impl<'a> DocumentationSynthesizer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Produces notes for the start, every condition, every external service
    /// call, every data operation and every error handler. Existing annotation
    /// nodes are ignored.
    pub fn annotate(&self, graph: &WorkflowGraph, context: &DocumentationContext) -> Documentation {
        let templates = self.config.templates();
        let trigger = context
            .trigger
            .or_else(|| self.infer_trigger(graph))
            .unwrap_or(TriggerType::Manual);

        let purpose = if context.purpose.trim().is_empty() {
            format!("automates '{}'", graph.name)
        } else {
            context.purpose.trim().to_string()
        };
        let outcome = if context.outcome.trim().is_empty() {
            self.default_outcome(graph)
        } else {
            context.outcome.trim().to_string()
        };
        let description = templates.describe(&purpose, trigger.phrase(), &outcome);

        let mut notes = Vec::new();
        let start = graph.trigger().map(|n| n.id.clone());
        let start_text = templates.render(
            &NoteCategory::Start,
            &NoteContext {
                purpose: purpose.clone(),
                ..NoteContext::default()
            },
        );
        notes.push(self.note(
            start,
            NoteCategory::Start,
            format!("{}\n\n{}", start_text, description),
        ));

        let may_fail = self.config.catalog().may_fail_types();
        for node in graph.executable_nodes() {
            let spec = &node.spec;
            let guarded = self.guarded_node(graph, node, &may_fail);
            let role = if guarded.is_some() {
                NodeRole::ErrorHandler
            } else {
                spec.role
            };
            let (category, ctx) = match role {
                NodeRole::Condition => (
                    NoteCategory::Decision,
                    NoteContext {
                        condition: or_name(&spec.intent, node).to_string(),
                        ..NoteContext::default()
                    },
                ),
                NodeRole::Action => {
                    let Some(service) = self.service_of(node) else {
                        continue;
                    };
                    (
                        NoteCategory::ApiCall,
                        NoteContext {
                            service,
                            action: or_name(&spec.intent, node).to_string(),
                            ..NoteContext::default()
                        },
                    )
                }
                NodeRole::DataOp => (
                    NoteCategory::DataTransform,
                    NoteContext {
                        operation: or_name(&spec.intent, node).to_string(),
                        ..NoteContext::default()
                    },
                ),
                NodeRole::ErrorHandler => {
                    let scenario = match (spec.intent.is_empty(), guarded) {
                        (true, Some(source)) => format!("{} fails", source.name()),
                        _ => or_name(&spec.intent, node).to_string(),
                    };
                    (
                        NoteCategory::ErrorHandling,
                        NoteContext {
                            scenario,
                            ..NoteContext::default()
                        },
                    )
                }
                _ => continue,
            };
            let content = templates.render(&category, &ctx);
            notes.push(self.note(Some(node.id.clone()), category, content));
        }

        for custom in &context.notes {
            let category = NoteCategory::from_key(&custom.category);
            let anchor = custom
                .anchor
                .as_deref()
                .and_then(|name| graph.node_by_name(name))
                .map(|n| n.id.clone());
            let content = templates.render(
                &category,
                &NoteContext {
                    description: custom.description.clone(),
                    ..NoteContext::default()
                },
            );
            notes.push(self.note(anchor, category, content));
        }

        Documentation { notes, description }
    }

    fn note(&self, anchor: Option<String>, category: NoteCategory, content: String) -> AnnotationSpec {
        let color = self
            .config
            .documentation()
            .color_for(category.key())
            .to_string();
        AnnotationSpec {
            anchor,
            category,
            content,
            color,
        }
    }

    /// Catalog entry behind a node, by semantic key or, for graphs loaded
    /// from JSON, by node type.
    fn entry_of(&self, node: &PlacedNode) -> Option<&'a NodeCatalogEntry> {
        let catalog = self.config.catalog();
        catalog
            .get(&node.spec.semantic_key)
            .filter(|e| e.node_type == node.spec.node_type)
            .or_else(|| catalog.find_by_type(&node.spec.node_type))
    }

    /// Name of the external service an action talks to, if it talks to one.
    fn service_of(&self, node: &PlacedNode) -> Option<String> {
        let spec = &node.spec;
        if let Some(service) = &spec.service {
            return Some(service.clone());
        }
        let entry = self
            .entry_of(node)
            .filter(|e| e.may_fail || e.credential_type.is_some());
        if let Some(entry) = entry {
            return Some(entry.display_name.clone());
        }
        (spec.may_fail || !spec.credentials.is_empty()).then(|| node.name().to_string())
    }

    /// The failure-prone node an error handler guards.
    ///
    /// Generated specs know their role. Loaded graphs lose it, so a node of
    /// the failure-pattern type counts as a handler when it hangs off a
    /// failure-prone node's error output, or off output 0 of one without
    /// an error output.
    fn guarded_node<'g>(
        &self,
        graph: &'g WorkflowGraph,
        node: &PlacedNode,
        may_fail: &AHashSet<&str>,
    ) -> Option<&'g PlacedNode> {
        let spec = &node.spec;
        let recoverable = spec.semantic_key.is_empty()
            && self
                .config
                .error_handling()
                .failure_pattern()
                .is_some_and(|p| p.node_type == spec.node_type);
        if spec.role != NodeRole::ErrorHandler && !recoverable {
            return None;
        }
        graph
            .connections
            .edges()
            .filter(|e| e.target == node.id)
            .filter_map(|e| graph.node(e.source).map(|source| (e.output, source)))
            .find(|(output, source)| {
                may_fail.contains(source.node_type())
                    && match source.spec.on_error {
                        Some(_) => *output > 0,
                        None => *output == 0,
                    }
            })
            .map(|(_, source)| source)
    }

    fn infer_trigger(&self, graph: &WorkflowGraph) -> Option<TriggerType> {
        let node = graph.trigger()?;
        TriggerType::ALL.into_iter().find(|t| {
            self.config
                .catalog()
                .get(t.semantic_key())
                .is_some_and(|entry| entry.node_type == node.spec.node_type)
        })
    }

    fn default_outcome(&self, graph: &WorkflowGraph) -> String {
        let names = graph
            .nodes_with_role(NodeRole::Action)
            .filter(|n| n.spec.semantic_key != "branch_end")
            .map(|n| n.name())
            .join(", ");
        if names.is_empty() {
            "its steps being completed".to_string()
        } else {
            format!("{} being completed", names)
        }
    }
}
