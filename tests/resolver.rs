//! Tests for semantic resolution, parameter merging and error-handler planning.
mod common;
use common::*;
use serde_json::{Map, json};
use textflow::resolver::DiagnosticKind;
use textflow::prelude::*;

fn resolve(config: &GeneratorConfig, description: &str) -> Resolution {
    resolve_with(config, description, &ParameterOverrides::new(), &[])
}

fn resolve_with(
    config: &GeneratorConfig,
    description: &str,
    overrides: &ParameterOverrides,
    services: &[String],
) -> Resolution {
    let classification = classifier().classify(description);
    NodeResolver::new(config).resolve(&classification, overrides, services)
}

fn keys(resolution: &Resolution) -> Vec<(&str, NodeRole)> {
    resolution
        .specs
        .iter()
        .map(|s| (s.semantic_key.as_str(), s.role))
        .collect()
}

fn kinds(resolution: &Resolution) -> Vec<DiagnosticKind> {
    resolution.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn test_specs_follow_role_order() {
    let resolution = resolve(&standard_config(), DAILY_REPORT);
    assert_eq!(
        keys(&resolution),
        vec![
            ("schedule", NodeRole::Trigger),
            ("http_request", NodeRole::Action),
            ("send_email", NodeRole::Action),
            ("error_handler", NodeRole::ErrorHandler),
            ("error_handler", NodeRole::ErrorHandler),
        ]
    );
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_schedule_hint_fills_trigger_times() {
    let resolution = resolve(&standard_config(), DAILY_REPORT);
    let trigger = &resolution.specs[0];
    assert_eq!(trigger.node_type, "n8n-nodes-base.cron");
    assert_eq!(
        trigger.parameters["triggerTimes"],
        json!({ "item": [{ "mode": "everyDay", "hour": 9, "minute": 0 }] })
    );
}

#[test]
fn test_missing_required_fields_are_recorded_not_thrown() {
    let resolution = resolve(&standard_config(), DAILY_REPORT);
    let http = &resolution.specs[1];
    let email = &resolution.specs[2];
    assert_eq!(http.missing_fields, vec!["url"]);
    assert_eq!(email.missing_fields, vec!["toEmail"]);
    assert_eq!(email.parameters["subject"], json!("Workflow notification"));
}

#[test]
fn test_entities_fill_required_fields() {
    let resolution = resolve(&standard_config(), ORDER_EXPORT);
    let http = resolution.specs.iter().find(|s| s.semantic_key == "http_request").unwrap();
    let email = resolution.specs.iter().find(|s| s.semantic_key == "send_email").unwrap();
    assert_eq!(http.parameters["url"], json!("https://shop.example.com/api/orders"));
    assert_eq!(email.parameters["toEmail"], json!("ops@example.com"));
    assert!(http.is_complete());
    assert!(email.is_complete());
}

#[test]
fn test_caller_overrides_beat_text_and_defaults() {
    let mut overrides = ParameterOverrides::new();
    let mut http = Map::new();
    http.insert("url".to_string(), json!("https://override.example.com"));
    http.insert("requestMethod".to_string(), json!("POST"));
    overrides.insert("http_request".to_string(), http);
    let mut slack = Map::new();
    slack.insert("channel".to_string(), json!("#ops"));
    overrides.insert("slack".to_string(), slack);

    let resolution = resolve_with(&standard_config(), ORDER_EXPORT, &overrides, &[]);
    let spec = resolution.specs.iter().find(|s| s.semantic_key == "http_request").unwrap();
    assert_eq!(spec.parameters["url"], json!("https://override.example.com"));
    assert_eq!(spec.parameters["requestMethod"], json!("POST"));
    // Untouched defaults survive the merge.
    assert_eq!(spec.parameters["timeout"], json!(10000));

    assert_eq!(kinds(&resolution), vec![DiagnosticKind::UnusedOverride]);
}

#[test]
fn test_unknown_key_falls_back_to_generic_node() {
    let resolution = resolve(&standard_config(), "Update the inventory");
    let action = &resolution.specs[1];
    assert_eq!(action.name, "Update");
    assert_eq!(action.node_type, "n8n-nodes-base.code");
    assert_eq!(action.role, NodeRole::Action);
    assert!(action.fallback);
    assert!(action.parameters["jsCode"].as_str().unwrap().contains("$input.all()"));
    assert_eq!(resolution.unresolved_keys().collect::<Vec<_>>(), vec!["update"]);
    assert_eq!(kinds(&resolution), vec![DiagnosticKind::UnresolvedKey]);
}

#[test]
fn test_data_op_verbs_become_data_ops_only() {
    let resolution = resolve(&standard_config(), "Transform the records");
    assert_eq!(
        keys(&resolution),
        vec![
            ("manual", NodeRole::Trigger),
            ("process", NodeRole::Action),
            ("transform", NodeRole::DataOp),
        ]
    );
    assert_eq!(
        kinds(&resolution),
        vec![DiagnosticKind::DefaultAction, DiagnosticKind::UnresolvedKey]
    );
}

#[test]
fn test_empty_description_synthesizes_default_action() {
    let resolution = resolve(&standard_config(), "");
    assert_eq!(
        keys(&resolution),
        vec![("manual", NodeRole::Trigger), ("process", NodeRole::Action)]
    );
    assert_eq!(
        kinds(&resolution),
        vec![
            DiagnosticKind::UnclassifiedInput,
            DiagnosticKind::DefaultAction,
            DiagnosticKind::UnresolvedKey,
        ]
    );
}

#[test]
fn test_context_services_are_appended() {
    let services = vec![
        "Slack".to_string(),
        "http_request".to_string(),
        "slack".to_string(),
    ];
    let resolution = resolve_with(
        &standard_config(),
        "Copy the sheet",
        &ParameterOverrides::new(),
        &services,
    );
    let actions: Vec<&str> = resolution
        .with_role(NodeRole::Action)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(actions, vec!["Slack", "HTTP Request"]);
    assert_eq!(resolution.with_role(NodeRole::ErrorHandler).count(), 2);
}

#[test]
fn test_condition_keywords_map_to_condition_nodes() {
    let resolution = resolve(&standard_config(), CONDITIONAL_MAIL);
    let condition = resolution.with_role(NodeRole::Condition).next().unwrap();
    assert_eq!(condition.node_type, "n8n-nodes-base.if");
    assert_eq!(condition.outputs, 2);
    assert_eq!(condition.intent, "if");
}

#[test]
fn test_switch_keyword_selects_the_switch_node() {
    let resolution = resolve(&standard_config(), "Switch on the order status and send an email");
    let condition = resolution.with_role(NodeRole::Condition).next().unwrap();
    assert_eq!(condition.semantic_key, "switch");
    assert_eq!(condition.node_type, "n8n-nodes-base.switch");
    assert_eq!(condition.outputs, 4);
}

#[test]
fn test_error_handlers_guard_failure_prone_specs() {
    let resolution = resolve(&standard_config(), DAILY_REPORT);
    let handlers: Vec<&NodeSpec> = resolution.with_role(NodeRole::ErrorHandler).collect();
    assert_eq!(handlers[0].name, "HTTP Request Fallback");
    assert_eq!(handlers[0].guards, Some(1));
    assert_eq!(handlers[0].node_type, "n8n-nodes-base.noOp");
    assert_eq!(
        handlers[0].parameters["notice"],
        json!("API call failed - continuing with default values")
    );
    assert_eq!(handlers[1].guards, Some(2));
}

#[test]
fn test_disabled_policy_plans_no_handlers() {
    let config = config_with(|s| s.error_handling.enabled = false);
    let resolution = resolve(&config, DAILY_REPORT);
    assert_eq!(resolution.with_role(NodeRole::ErrorHandler).count(), 0);
}

#[test]
fn test_credentials_are_placeholders() {
    let resolution = resolve(&standard_config(), DAILY_REPORT);
    let email = &resolution.specs[2];
    let value = serde_json::to_value(email).unwrap();
    assert_eq!(value["credentials"], json!({ "smtp": { "name": "smtp" } }));
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["name", "type", "typeVersion", "parameters", "credentials"]);
}
