//! The validation pipeline.
//!
//! Every rule is evaluated every time; the pipeline never stops at the first
//! failure. Structural failures (and node counts outside the configured
//! range) are the only findings that should block execution.

mod formatter;
mod rules;

pub use formatter::ReportFormatter;
pub use rules::{RuleCategory, RuleId, RuleResult};

use crate::catalog::NodeRole;
use crate::config::GeneratorConfig;
use crate::graph::WorkflowGraph;
use crate::resolver::{Diagnostic, Resolution, missing_fields};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

/// Properties every emitted workflow document must carry.
const REQUIRED_WORKFLOW_FIELDS: [&str; 5] = ["name", "nodes", "connections", "active", "settings"];

/// The complete set of rule outcomes for one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub results: Vec<RuleResult>,
    /// Soft findings carried over from resolution.
    pub diagnostics: Vec<Diagnostic>,
    /// Executable nodes, annotations excluded.
    pub node_count: usize,
}

impl ValidationReport {
    /// True only when every rule passed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn get(&self, rule_id: RuleId) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn blocking_failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.failures().filter(|r| r.rule_id.is_blocking())
    }

    pub fn is_blocked(&self) -> bool {
        self.blocking_failures().next().is_some()
    }
}

fn verdict(rule: RuleId, problems: Vec<String>, ok: impl Into<String>) -> RuleResult {
    if problems.is_empty() {
        RuleResult::new(rule, true, ok)
    } else {
        RuleResult::new(rule, false, problems.join("; "))
    }
}

/// Runs the configured rules against a graph. Read-only.
pub struct ValidationPipeline<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ValidationPipeline<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Validates a graph on its own, e.g. one read back from JSON.
    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationReport {
        self.run(graph, None)
    }

    /// Validates a freshly built graph against the resolution it came from.
    pub fn validate_resolution(
        &self,
        graph: &WorkflowGraph,
        resolution: &Resolution,
    ) -> ValidationReport {
        self.run(graph, Some(resolution))
    }

    fn run(&self, graph: &WorkflowGraph, resolution: Option<&Resolution>) -> ValidationReport {
        let results: Vec<RuleResult> = RuleId::ALL
            .iter()
            .map(|&rule| self.check(rule, graph, resolution))
            .collect();

        for failed in results.iter().filter(|r| !r.passed) {
            debug!(rule = %failed.rule_id, message = %failed.message, "validation rule failed");
        }

        let report = ValidationReport {
            results,
            diagnostics: resolution.map(|r| r.diagnostics.clone()).unwrap_or_default(),
            node_count: graph.executable_count(),
        };
        info!(
            passed = report.passed(),
            failures = report.failures().count(),
            blocking = report.blocking_failures().count(),
            "validated workflow '{}'",
            graph.name
        );
        report
    }

    fn check(
        &self,
        rule: RuleId,
        graph: &WorkflowGraph,
        resolution: Option<&Resolution>,
    ) -> RuleResult {
        match rule {
            RuleId::ParseTextDescription => self.parse_text_description(resolution),
            RuleId::IdentifyComponents => self.identify_components(resolution),
            RuleId::MapBusinessLogic => self.map_business_logic(resolution),
            RuleId::PlanErrorHandling => self.plan_error_handling(resolution),
            RuleId::ValidateJsonSyntax => self.json_syntax(graph),
            RuleId::CheckNodeIdUniqueness => self.id_uniqueness(graph),
            RuleId::VerifyConnectionIntegrity => self.connection_integrity(graph),
            RuleId::TriggerPresent => self.role_present(rule, graph, NodeRole::Trigger),
            RuleId::ActionPresent => self.role_present(rule, graph, NodeRole::Action),
            RuleId::EnsureAllNodesConnected => self.all_connected(graph),
            RuleId::ValidateCredentialReferences => self.credential_references(graph),
            RuleId::ValidateNodeNames => self.node_names(graph),
            RuleId::AllActionsImplemented => self.actions_implemented(graph, resolution),
            RuleId::ErrorHandlingIncluded => self.error_handling_included(graph),
            RuleId::CheckMissingParameters => self.missing_parameters(graph),
            RuleId::MinimumNodes => {
                let minimum = self.config.quality().minimum_nodes;
                let count = graph.executable_count();
                RuleResult::new(
                    rule,
                    count >= minimum,
                    format!("{} executable node(s), at least {} required", count, minimum),
                )
            }
            RuleId::MaximumNodes => {
                let maximum = self.config.quality().maximum_nodes;
                let count = graph.executable_count();
                RuleResult::new(
                    rule,
                    count <= maximum,
                    format!("{} executable node(s), at most {} allowed", count, maximum),
                )
            }
        }
    }

    // Pre-generation rules hold by construction once the classifier and
    // resolver have run; they are reported so the rule list stays complete.

    fn parse_text_description(&self, resolution: Option<&Resolution>) -> RuleResult {
        let message = match resolution {
            Some(r) if r.specs.is_empty() => "description produced no node specs",
            Some(_) => "description classified",
            None => "graph supplied directly; no description to parse",
        };
        RuleResult::new(
            RuleId::ParseTextDescription,
            resolution.is_none_or(|r| !r.specs.is_empty()),
            message,
        )
    }

    fn identify_components(&self, resolution: Option<&Resolution>) -> RuleResult {
        let Some(resolution) = resolution else {
            return RuleResult::new(RuleId::IdentifyComponents, true, "no resolution to inspect");
        };
        let triggers = resolution.with_role(NodeRole::Trigger).count();
        let actions = resolution.with_role(NodeRole::Action).count();
        RuleResult::new(
            RuleId::IdentifyComponents,
            triggers == 1 && actions >= 1,
            format!("{} trigger(s), {} action(s) identified", triggers, actions),
        )
    }

    fn map_business_logic(&self, resolution: Option<&Resolution>) -> RuleResult {
        let Some(resolution) = resolution else {
            return RuleResult::new(RuleId::MapBusinessLogic, true, "no resolution to inspect");
        };
        let unmapped: Vec<String> = resolution
            .specs
            .iter()
            .filter(|s| s.node_type.trim().is_empty())
            .map(|s| s.name.clone())
            .collect();
        let fallbacks = resolution.unresolved_keys().join(", ");
        let ok = if fallbacks.is_empty() {
            "every intent mapped to a catalog node".to_string()
        } else {
            format!("mapped; generic node used for: {}", fallbacks)
        };
        verdict(
            RuleId::MapBusinessLogic,
            unmapped
                .into_iter()
                .map(|n| format!("'{}' has no node type", n))
                .collect(),
            ok,
        )
    }

    fn plan_error_handling(&self, resolution: Option<&Resolution>) -> RuleResult {
        let policy = self.config.error_handling();
        if !policy.enabled {
            return RuleResult::new(RuleId::PlanErrorHandling, true, "error handling disabled");
        }
        let Some(resolution) = resolution else {
            return RuleResult::new(RuleId::PlanErrorHandling, true, "no resolution to inspect");
        };
        let guarded: AHashSet<usize> = resolution.specs.iter().filter_map(|s| s.guards).collect();
        let problems = resolution
            .specs
            .iter()
            .enumerate()
            .filter(|(i, s)| s.may_fail && !guarded.contains(i))
            .map(|(_, s)| format!("no error handler planned for '{}'", s.name))
            .collect();
        verdict(
            RuleId::PlanErrorHandling,
            problems,
            format!("{} error handler(s) planned", guarded.len()),
        )
    }

    fn json_syntax(&self, graph: &WorkflowGraph) -> RuleResult {
        let indent = self.config.output().json_indentation;
        let parsed = graph
            .to_json(indent)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                serde_json::from_str::<serde_json::Value>(&json).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(value) => {
                let missing: Vec<String> = REQUIRED_WORKFLOW_FIELDS
                    .iter()
                    .filter(|f| value.get(**f).is_none())
                    .map(|f| format!("missing property '{}'", f))
                    .collect();
                verdict(RuleId::ValidateJsonSyntax, missing, "serializes to valid JSON")
            }
            Err(message) => RuleResult::new(RuleId::ValidateJsonSyntax, false, message),
        }
    }

    fn id_uniqueness(&self, graph: &WorkflowGraph) -> RuleResult {
        let mut problems: Vec<String> = graph
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .duplicates()
            .map(|id| format!("duplicate node id '{}'", id))
            .collect();
        problems.extend(
            graph
                .nodes
                .iter()
                .filter(|n| n.id.trim().is_empty())
                .map(|n| format!("node '{}' has an empty id", n.name())),
        );
        verdict(
            RuleId::CheckNodeIdUniqueness,
            problems,
            format!("{} unique node id(s)", graph.nodes.len()),
        )
    }

    fn connection_integrity(&self, graph: &WorkflowGraph) -> RuleResult {
        let ids: AHashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut problems: Vec<String> = graph
            .connections
            .0
            .keys()
            .filter(|source| !ids.contains(source.as_str()))
            .map(|source| format!("connection source '{}' does not exist", source))
            .collect();
        problems.extend(
            graph
                .connections
                .edges()
                .filter(|e| !ids.contains(e.target))
                .map(|e| format!("connection target '{}' does not exist", e.target))
                .unique(),
        );
        verdict(
            RuleId::VerifyConnectionIntegrity,
            problems,
            format!("{} connection(s) resolve", graph.connections.len()),
        )
    }

    fn role_present(&self, rule: RuleId, graph: &WorkflowGraph, role: NodeRole) -> RuleResult {
        let count = graph.nodes_with_role(role).count();
        RuleResult::new(
            rule,
            count > 0,
            format!("{} {} node(s)", count, role),
        )
    }

    fn all_connected(&self, graph: &WorkflowGraph) -> RuleResult {
        let mut inbound: AHashMap<&str, usize> = AHashMap::new();
        for edge in graph.connections.edges() {
            *inbound.entry(edge.target).or_default() += 1;
        }
        let orphans: Vec<String> = graph
            .executable_nodes()
            .filter(|n| n.role() != NodeRole::Trigger)
            .filter(|n| !inbound.contains_key(n.id.as_str()))
            .map(|n| format!("'{}' has no inbound connection", n.name()))
            .collect();
        verdict(
            RuleId::EnsureAllNodesConnected,
            orphans,
            "every non-trigger node is reachable",
        )
    }

    fn credential_references(&self, graph: &WorkflowGraph) -> RuleResult {
        if !self.config.quality().credential_validation {
            return RuleResult::new(
                RuleId::ValidateCredentialReferences,
                true,
                "credential validation disabled",
            );
        }
        let mut problems = Vec::new();
        let mut checked = 0;
        for node in &graph.nodes {
            for (credential_type, reference) in &node.spec.credentials {
                checked += 1;
                if !self.config.is_recognized_credential(credential_type) {
                    problems.push(format!(
                        "'{}' references unknown credential type '{}'",
                        node.name(),
                        credential_type
                    ));
                }
                if reference.name.trim().is_empty() {
                    problems.push(format!(
                        "'{}' has an empty '{}' credential name",
                        node.name(),
                        credential_type
                    ));
                }
            }
        }
        verdict(
            RuleId::ValidateCredentialReferences,
            problems,
            format!("{} credential reference(s) recognised", checked),
        )
    }

    fn node_names(&self, graph: &WorkflowGraph) -> RuleResult {
        let naming = self.config.naming();
        let mut problems: Vec<String> = graph
            .nodes
            .iter()
            .filter_map(|n| naming.violation(n.name()))
            .collect();
        problems.extend(
            graph
                .nodes
                .iter()
                .map(|n| n.name())
                .duplicates()
                .map(|name| format!("duplicate node name '{}'", name)),
        );
        verdict(RuleId::ValidateNodeNames, problems, "all node names are valid")
    }

    /// With a resolution, every resolved action, condition and data operation
    /// must have a node of the same type in the graph.
    fn actions_implemented(
        &self,
        graph: &WorkflowGraph,
        resolution: Option<&Resolution>,
    ) -> RuleResult {
        let Some(resolution) = resolution else {
            let untyped: Vec<String> = graph
                .nodes_with_role(NodeRole::Action)
                .filter(|n| n.node_type().trim().is_empty())
                .map(|n| format!("'{}' has no node type", n.name()))
                .collect();
            return verdict(
                RuleId::AllActionsImplemented,
                untyped,
                "every action node has a concrete type",
            );
        };

        let mut available: AHashMap<&str, usize> = AHashMap::new();
        for node in graph.executable_nodes() {
            *available.entry(node.node_type()).or_default() += 1;
        }
        let mut problems = Vec::new();
        let mut expected = 0;
        for spec in resolution.specs.iter().filter(|s| {
            matches!(
                s.role,
                NodeRole::Action | NodeRole::Condition | NodeRole::DataOp
            )
        }) {
            expected += 1;
            match available.get_mut(spec.node_type.as_str()) {
                Some(n) if *n > 0 => *n -= 1,
                _ => problems.push(format!("'{}' was resolved but not placed", spec.name)),
            }
        }
        verdict(
            RuleId::AllActionsImplemented,
            problems,
            format!("{} resolved step(s) implemented", expected),
        )
    }

    /// Every node of a network-bound type needs an edge into a failure-pattern node.
    fn error_handling_included(&self, graph: &WorkflowGraph) -> RuleResult {
        let policy = self.config.error_handling();
        if !policy.enabled {
            return RuleResult::new(RuleId::ErrorHandlingIncluded, true, "error handling disabled");
        }
        let Some(pattern) = policy.failure_pattern() else {
            return RuleResult::new(
                RuleId::ErrorHandlingIncluded,
                false,
                format!("unknown failure pattern '{}'", policy.pattern),
            );
        };

        let may_fail = self.config.catalog().may_fail_types();
        let mut guarded = 0;
        let problems: Vec<String> = graph
            .executable_nodes()
            .filter(|n| n.role() != NodeRole::ErrorHandler)
            .filter(|n| may_fail.contains(n.node_type()))
            .filter(|n| {
                let handled = graph.connections.outgoing(&n.id).any(|e| {
                    graph
                        .node(e.target)
                        .is_some_and(|t| t.node_type() == pattern.node_type)
                });
                if handled {
                    guarded += 1;
                }
                !handled
            })
            .map(|n| format!("'{}' may fail but has no error handler", n.name()))
            .collect();
        verdict(
            RuleId::ErrorHandlingIncluded,
            problems,
            format!("{} failure-prone node(s) guarded", guarded),
        )
    }

    fn missing_parameters(&self, graph: &WorkflowGraph) -> RuleResult {
        let catalog = self.config.catalog();
        let problems: Vec<String> = graph
            .executable_nodes()
            .filter_map(|node| {
                let mut required = node.spec.required_fields.clone();
                let entry = catalog
                    .get(&node.spec.semantic_key)
                    .filter(|e| e.node_type == node.spec.node_type)
                    .or_else(|| catalog.find_by_type(&node.spec.node_type));
                if let Some(entry) = entry {
                    for field in &entry.required_fields {
                        if !required.contains(field) {
                            required.push(field.clone());
                        }
                    }
                }
                let missing = missing_fields(&node.spec.parameters, &required);
                (!missing.is_empty())
                    .then(|| format!("'{}' is missing {}", node.name(), missing.join(", ")))
            })
            .collect();
        verdict(
            RuleId::CheckMissingParameters,
            problems,
            "all required parameters are set",
        )
    }
}
