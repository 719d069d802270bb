//! Tests for id assignment, layout and wiring.
mod common;
use common::*;
use textflow::graph::Position;
use textflow::prelude::*;

fn spec(config: &GeneratorConfig, key: &str) -> NodeSpec {
    NodeSpec::from_entry(key, config.catalog().get(key).unwrap())
}

#[test]
fn test_ids_come_from_the_injected_generator() {
    let (_, graph) = build_graph(&standard_config(), DAILY_REPORT);
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["node-0001", "node-0002", "node-0003", "node-0004", "node-0005"]
    );
}

#[test]
fn test_main_chain_runs_left_to_right() {
    let (_, graph) = build_graph(&standard_config(), DAILY_REPORT);
    assert_eq!(node(&graph, "Schedule Trigger").position, Position(250, 300));
    assert_eq!(node(&graph, "HTTP Request").position, Position(650, 300));
    assert_eq!(node(&graph, "Send Email").position, Position(1050, 300));
    assert!(wired(&graph, "Schedule Trigger", 0, "HTTP Request"));
    assert!(wired(&graph, "HTTP Request", 0, "Send Email"));
}

#[test]
fn test_error_handlers_use_the_error_output() {
    let (_, graph) = build_graph(&standard_config(), DAILY_REPORT);
    assert!(wired(&graph, "HTTP Request", 1, "HTTP Request Fallback"));
    assert!(wired(&graph, "Send Email", 1, "Send Email Fallback"));
    assert_eq!(
        node(&graph, "HTTP Request").spec.on_error.as_deref(),
        Some("continueErrorOutput")
    );
    // One stage to the right, one lane down.
    assert_eq!(node(&graph, "HTTP Request Fallback").position, Position(1050, 500));
    assert_eq!(node(&graph, "Send Email Fallback").position, Position(1450, 500));
}

#[test]
fn test_error_handlers_without_error_output_run_in_parallel() {
    let config = config_with(|s| {
        if let Some(entry) = s.catalog.entries.get_mut("http_request") {
            entry.error_output = false;
        }
    });
    let (_, graph) = build_graph(&config, DAILY_REPORT);
    assert!(wired(&graph, "HTTP Request", 0, "Send Email"));
    assert!(wired(&graph, "HTTP Request", 0, "HTTP Request Fallback"));
    assert!(node(&graph, "HTTP Request").spec.on_error.is_none());
}

#[test]
fn test_data_ops_are_spliced_in_line() {
    let (_, graph) = build_graph(&standard_config(), SLACK_DIGEST);
    assert!(wired(&graph, "Webhook", 0, "HTTP Request"));
    assert!(wired(&graph, "HTTP Request", 0, "Transform Data"));
    assert!(wired(&graph, "Transform Data", 0, "Slack"));
    assert!(!wired(&graph, "HTTP Request", 0, "Slack"));
}

#[test]
fn test_condition_fans_out_on_both_outputs() {
    let (_, graph) = build_graph(&standard_config(), CONDITIONAL_MAIL);
    assert!(wired(&graph, "Send Email", 0, "If"));
    assert!(wired(&graph, "If", 0, "If Met"));
    assert!(wired(&graph, "If", 1, "If Not Met"));

    let condition = node(&graph, "If").position;
    let met = node(&graph, "If Met").position;
    let not_met = node(&graph, "If Not Met").position;
    // Branches share a stage and are separated vertically.
    assert_eq!(met.x(), condition.x() + 400);
    assert_eq!(not_met.x(), met.x());
    assert_eq!(not_met.y() - met.y(), 200);
}

#[test]
fn test_multi_output_conditions_get_a_leaf_per_output() {
    let config = standard_config();
    let specs = vec![
        spec(&config, "manual"),
        spec(&config, "code"),
        spec(&config, "switch"),
    ];
    let ids = SequentialIdGenerator::default();
    let graph = GraphBuilder::new(&config, &ids).build("Switch Test", specs);
    for output in 0..4 {
        let leaf = format!("Switch Output {}", output + 1);
        assert!(wired(&graph, "Switch", output, &leaf), "missing {}", leaf);
    }
    assert_eq!(graph.executable_count(), 7);
}

#[test]
fn test_switch_from_text_fans_out_on_every_output() {
    let (_, graph) = build_graph(&standard_config(), "Switch on the order status and send an email");
    for output in 0..4 {
        let leaf = format!("Switch Output {}", output + 1);
        assert!(wired(&graph, "Switch", output, &leaf), "missing {}", leaf);
    }
}

#[test]
fn test_names_are_made_unique() {
    let config = standard_config();
    let specs = vec![
        spec(&config, "manual"),
        spec(&config, "code"),
        spec(&config, "code"),
        spec(&config, "code"),
    ];
    let ids = SequentialIdGenerator::default();
    let graph = GraphBuilder::new(&config, &ids).build("Names", specs);
    assert_eq!(names(&graph), vec!["Manual Trigger", "Code", "Code 2", "Code 3"]);
}

#[test]
fn test_extra_triggers_feed_the_first_action() {
    let config = standard_config();
    let specs = vec![
        spec(&config, "manual"),
        spec(&config, "webhook"),
        spec(&config, "code"),
    ];
    let ids = SequentialIdGenerator::default();
    let graph = GraphBuilder::new(&config, &ids).build("Two Triggers", specs);
    assert!(wired(&graph, "Manual Trigger", 0, "Code"));
    assert!(wired(&graph, "Webhook", 0, "Code"));
    assert_eq!(node(&graph, "Webhook").position, Position(250, 500));
}

#[test]
fn test_edges_only_point_forward_and_resolve() {
    let config = standard_config();
    for description in [DAILY_REPORT, ORDER_EXPORT, SLACK_DIGEST, CONDITIONAL_MAIL, ""] {
        let (_, graph) = build_graph(&config, description);
        for edge in graph.connections.edges() {
            let source = graph.node(edge.source).expect("source exists");
            let target = graph.node(edge.target).expect("target exists");
            assert!(
                target.position.x() > source.position.x(),
                "{} -> {} is not a forward edge",
                source.name(),
                target.name()
            );
        }
    }
}

#[test]
fn test_workflow_defaults_are_applied() {
    let (_, graph) = build_graph(&standard_config(), DAILY_REPORT);
    assert_eq!(graph.name, "Test Workflow");
    assert!(!graph.active);
    assert_eq!(graph.settings.execution_order, "v1");
    assert_eq!(
        graph.tags.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["generated", "text-description"]
    );
}

#[test]
fn test_custom_layout_spacing() {
    let config = config_with(|s| {
        s.layout.origin = [0, 0];
        s.layout.horizontal_spacing = 300;
        s.layout.vertical_spacing = 150;
    });
    let (_, graph) = build_graph(&config, DAILY_REPORT);
    assert_eq!(node(&graph, "Send Email").position, Position(600, 0));
    assert_eq!(node(&graph, "HTTP Request Fallback").position, Position(600, 150));
}
