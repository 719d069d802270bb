//! Common test utilities: configuration, deterministic generators and sample descriptions.
use std::sync::Arc;
use textflow::prelude::*;

/// Schedule trigger, two network-bound actions, no parameters in the text.
#[allow(dead_code)]
pub const DAILY_REPORT: &str =
    "Every day at 9am, fetch orders from the API and send a summary email";

/// Literal URL and e-mail address that should land in node parameters.
#[allow(dead_code)]
pub const ORDER_EXPORT: &str =
    "Fetch orders from https://shop.example.com/api/orders and send them to ops@example.com by email";

/// A fetch, an in-line data operation and a Slack message.
#[allow(dead_code)]
pub const SLACK_DIGEST: &str = "Fetch orders from the API, transform them and send to slack";

/// A branching condition after an e-mail action.
#[allow(dead_code)]
pub const CONDITIONAL_MAIL: &str = "If the order is valid, send an email";

#[allow(dead_code)]
pub fn standard_config() -> GeneratorConfig {
    GeneratorConfig::standard().expect("standard configuration must compile")
}

#[allow(dead_code)]
pub fn config_with(edit: impl FnOnce(&mut GeneratorSettings)) -> GeneratorConfig {
    let mut settings = GeneratorSettings::default();
    edit(&mut settings);
    GeneratorConfig::from_settings(settings).expect("edited configuration must compile")
}

#[allow(dead_code)]
pub fn classifier() -> KeywordClassifier {
    KeywordClassifier::new(standard_config().taxonomy().clone())
}

/// A generator with `node-0001` style ids.
#[allow(dead_code)]
pub fn generator() -> WorkflowGenerator {
    generator_for(standard_config())
}

#[allow(dead_code)]
pub fn generator_for(config: GeneratorConfig) -> WorkflowGenerator {
    WorkflowGenerator::builder(config)
        .with_id_generator(Arc::new(SequentialIdGenerator::default()))
        .build()
}

#[allow(dead_code)]
pub fn generate(description: &str) -> GenerationOutcome {
    generator().generate(description, &GenerationContext::default())
}

/// Classifies, resolves and builds without documentation.
#[allow(dead_code)]
pub fn build_graph(config: &GeneratorConfig, description: &str) -> (Resolution, WorkflowGraph) {
    let classification = classifier().classify(description);
    let resolution =
        NodeResolver::new(config).resolve(&classification, &ParameterOverrides::new(), &[]);
    let ids = SequentialIdGenerator::default();
    let graph = GraphBuilder::new(config, &ids).build("Test Workflow", resolution.specs.clone());
    (resolution, graph)
}

#[allow(dead_code)]
pub fn names(graph: &WorkflowGraph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.name()).collect()
}

#[allow(dead_code)]
pub fn node<'a>(graph: &'a WorkflowGraph, name: &str) -> &'a PlacedNode {
    graph
        .node_by_name(name)
        .unwrap_or_else(|| panic!("no node named '{}' in {:?}", name, names(graph)))
}

/// True when `from` output `output` is wired to `to`.
#[allow(dead_code)]
pub fn wired(graph: &WorkflowGraph, from: &str, output: u32, to: &str) -> bool {
    let source = &node(graph, from).id;
    let target = &node(graph, to).id;
    graph
        .connections
        .targets(source, output)
        .iter()
        .any(|t| &t.node == target)
}
