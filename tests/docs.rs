//! Tests for note selection, templates and annotation placement.
mod common;
use common::*;
use textflow::docs::{CustomNote, DocumentationTemplates, NoteCategory};
use textflow::prelude::*;

fn categories(documentation: &Documentation) -> Vec<&str> {
    documentation.notes.iter().map(|n| n.category.key()).collect()
}

#[test]
fn test_notes_cover_every_anchor_point() {
    let outcome = generate(DAILY_REPORT);
    let documentation = outcome.documentation.expect("documentation enabled by default");
    assert_eq!(
        categories(&documentation),
        vec!["start", "api", "api", "error", "error"]
    );
    assert_eq!(documentation.notes[0].anchor.as_deref(), Some("node-0001"));
    assert_eq!(
        documentation.notes[1].content,
        "🌐 API CALL\n\nService: HTTP Request\nAction: fetch\n\nConnecting to external service."
    );
    assert_eq!(
        documentation.notes[3].content,
        "⚠️ ERROR HANDLING\n\nScenario: HTTP Request fails\n\nHandles errors gracefully."
    );
}

#[test]
fn test_description_is_appended_to_the_start_note() {
    let context = GenerationContext {
        purpose: "sends a daily order summary".to_string(),
        outcome: "an email in the team inbox".to_string(),
        ..GenerationContext::default()
    };
    let outcome = generator().generate(DAILY_REPORT, &context);
    let documentation = outcome.documentation.unwrap();
    let expected = "This workflow sends a daily order summary. It is triggered on a schedule \
                    and results in an email in the team inbox.";
    assert_eq!(documentation.description, expected);

    let start = &documentation.notes[0];
    assert_eq!(start.category, NoteCategory::Start);
    assert!(start.content.starts_with("🚀 WORKFLOW START\n\nPurpose: sends a daily order summary"));
    assert!(start.content.ends_with(expected));
    assert_eq!(start.color, "#FFD700");
}

#[test]
fn test_synthesizer_infers_trigger_and_outcome() {
    let config = standard_config();
    let (_, graph) = build_graph(&config, DAILY_REPORT);
    let documentation =
        DocumentationSynthesizer::new(&config).annotate(&graph, &DocumentationContext::default());
    assert_eq!(
        documentation.description,
        "This workflow automates 'Test Workflow'. It is triggered on a schedule \
         and results in HTTP Request, Send Email being completed."
    );
}

#[test]
fn test_conditions_and_data_ops_are_documented() {
    let outcome = generate(CONDITIONAL_MAIL);
    let documentation = outcome.documentation.unwrap();
    let decision = documentation
        .notes
        .iter()
        .find(|n| n.category == NoteCategory::Decision)
        .expect("decision note");
    assert_eq!(
        decision.content,
        "🔀 DECISION POINT\n\nCondition: if\n\nThe workflow branches based on this condition."
    );
    assert_eq!(decision.color, "#FF6B6B");

    let digest = generate(SLACK_DIGEST).documentation.unwrap();
    assert!(digest.notes.iter().any(|n| n.category == NoteCategory::DataTransform
        && n.content.contains("Operation: transform")));
}

#[test]
fn test_unknown_category_uses_generic_note() {
    let context = GenerationContext {
        notes: vec![
            CustomNote {
                category: "security".to_string(),
                description: "Rotate the API key monthly".to_string(),
                anchor: Some("HTTP Request".to_string()),
            },
            CustomNote {
                category: "todo".to_string(),
                ..CustomNote::default()
            },
        ],
        ..GenerationContext::default()
    };
    let outcome = generator().generate(DAILY_REPORT, &context);
    let documentation = outcome.documentation.unwrap();
    let security = &documentation.notes[documentation.notes.len() - 2];
    assert_eq!(security.content, "📝 SECURITY\n\nRotate the API key monthly");
    assert_eq!(
        security.anchor.as_deref(),
        Some(outcome.graph.node_by_name("HTTP Request").unwrap().id.as_str())
    );
    assert_eq!(security.color, "#D3D3D3");

    let todo = documentation.notes.last().unwrap();
    assert_eq!(todo.content, "📝 TODO\n\nAdditional workflow step");
    assert!(todo.anchor.is_none());
}

#[test]
fn test_templates_can_be_replaced() {
    let templates = DocumentationTemplates::standard()
        .with_template("decision", |ctx| format!("Branch on {}", ctx.condition))
        .with_template("review", |ctx| format!("Review: {}", ctx.description));
    assert!(templates.contains("review"));
    assert!(!DocumentationTemplates::empty().contains("start"));
    let config = standard_config().with_templates(templates);
    let outcome = generator_for(config).generate(CONDITIONAL_MAIL, &GenerationContext::default());
    let documentation = outcome.documentation.unwrap();
    assert!(documentation.notes.iter().any(|n| n.content == "Branch on if"));
}

#[test]
fn test_notes_are_sticky_nodes_above_the_graph() {
    let outcome = generate(DAILY_REPORT);
    let graph = &outcome.graph;
    assert_eq!(graph.annotation_count(), 5);
    let top = graph.executable_nodes().map(|n| n.position.y()).min().unwrap();
    for note in graph.nodes_with_role(NodeRole::Annotation) {
        assert_eq!(note.node_type(), "n8n-nodes-base.stickyNote");
        assert!(note.position.y() < top);
        assert_eq!(note.spec.parameters["width"], 240);
        assert_eq!(note.spec.parameters["height"], 160);
        assert!(note.spec.parameters["content"].as_str().is_some());
    }
    let notes: Vec<&str> = graph
        .nodes_with_role(NodeRole::Annotation)
        .map(|n| n.name())
        .collect();
    assert_eq!(notes[0], "Sticky Note");
    assert_eq!(notes[1], "Sticky Note 2");
}

#[test]
fn test_annotating_twice_only_swaps_notes() {
    let generator = generator();
    let outcome = generator.generate(DAILY_REPORT, &GenerationContext::default());
    let mut graph = outcome.graph.clone();

    generator.annotate(&mut graph, &DocumentationContext::default());
    generator.annotate(&mut graph, &DocumentationContext::default());

    let before: Vec<&PlacedNode> = outcome.graph.executable_nodes().collect();
    let after: Vec<&PlacedNode> = graph.executable_nodes().collect();
    assert_eq!(before, after);
    assert_eq!(outcome.graph.connections, graph.connections);
    assert_eq!(graph.annotation_count(), outcome.graph.annotation_count());
}

#[test]
fn test_documentation_can_be_disabled() {
    let generator = WorkflowGenerator::builder(standard_config())
        .with_documentation(false)
        .build();
    let outcome = generator.generate(DAILY_REPORT, &GenerationContext::default());
    assert!(outcome.documentation.is_none());
    assert_eq!(outcome.graph.annotation_count(), 0);
}

#[test]
fn test_removing_notes_keeps_the_graph_executable() {
    let outcome = generate(DAILY_REPORT);
    let mut graph = outcome.graph.clone();
    graph.nodes.retain(PlacedNode::is_executable);
    let report = generator().validate(&graph);
    assert!(!report.is_blocked());
    assert_eq!(report.node_count, outcome.report.node_count);
}

#[test]
fn test_reannotating_a_loaded_graph_keeps_ids_unique() {
    let outcome = generate(DAILY_REPORT);
    let mut loaded = WorkflowGraph::from_json(&outcome.graph.to_json_pretty().unwrap()).unwrap();

    // A fresh sequential generator hands out node-0001 again.
    let generator = generator();
    generator.annotate(&mut loaded, &DocumentationContext::default());

    let report = generator.validate(&loaded);
    let uniqueness = report.get(RuleId::CheckNodeIdUniqueness).unwrap();
    assert!(uniqueness.passed, "{}", uniqueness.message);
    assert!(!report.is_blocked());
    assert_eq!(loaded.annotation_count(), outcome.graph.annotation_count());
}

#[test]
fn test_loaded_graph_gets_the_same_notes() {
    let outcome = generate(DAILY_REPORT);
    let original = outcome.documentation.unwrap();
    let loaded = WorkflowGraph::from_json(&outcome.graph.to_json_pretty().unwrap()).unwrap();

    let config = standard_config();
    let context = DocumentationContext::default();
    let reloaded = DocumentationSynthesizer::new(&config).annotate(&loaded, &context);

    assert_eq!(categories(&reloaded), categories(&original));
    let errors = |documentation: &Documentation| -> Vec<String> {
        documentation
            .notes
            .iter()
            .filter(|n| n.category == NoteCategory::ErrorHandling)
            .map(|n| n.content.clone())
            .collect()
    };
    assert_eq!(errors(&reloaded), errors(&original));
    let anchors = |documentation: &Documentation| -> Vec<Option<String>> {
        documentation.notes.iter().map(|n| n.anchor.clone()).collect()
    };
    assert_eq!(anchors(&reloaded), anchors(&original));
}

#[test]
fn test_loaded_branch_leaves_are_not_error_handlers() {
    let outcome = generate(CONDITIONAL_MAIL);
    let original = outcome.documentation.unwrap();
    let loaded = WorkflowGraph::from_json(&outcome.graph.to_json(2).unwrap()).unwrap();
    let config = standard_config();
    let reloaded =
        DocumentationSynthesizer::new(&config).annotate(&loaded, &DocumentationContext::default());
    assert_eq!(categories(&reloaded), categories(&original));
}
