use crate::classifier::{ClassificationResult, Classifier, KeywordClassifier};
use crate::config::GeneratorConfig;
use crate::docs::{CustomNote, Documentation, DocumentationContext, DocumentationSynthesizer};
use crate::graph::{GraphBuilder, IdGenerator, UuidGenerator, WorkflowGraph};
use crate::resolver::{NodeResolver, ParameterOverrides, Resolution};
use crate::validation::{ValidationPipeline, ValidationReport};
use std::sync::Arc;
use tracing::info;

/// Structured input accompanying a description.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Completes "This workflow ..." in the generated description.
    pub purpose: String,
    /// Completes "... and results in ...".
    pub outcome: String,
    /// Extra services to call, by name or semantic key.
    pub services: Vec<String>,
    /// Parameters that override both catalog defaults and values read from the text.
    pub parameters: ParameterOverrides,
    pub notes: Vec<CustomNote>,
}

/// Everything produced by one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub classification: ClassificationResult,
    pub resolution: Resolution,
    /// The built graph, with annotation nodes when documentation is enabled.
    pub graph: WorkflowGraph,
    pub documentation: Option<Documentation>,
    pub report: ValidationReport,
}

impl GenerationOutcome {
    /// True when no structural rule failed and the node count is in range.
    pub fn is_executable(&self) -> bool {
        !self.report.is_blocked()
    }
}

/// End-to-end pipeline: classify, resolve, build, then annotate and validate.
pub struct WorkflowGenerator {
    config: GeneratorConfig,
    classifier: Box<dyn Classifier>,
    ids: Arc<dyn IdGenerator>,
    documentation: bool,
}

pub struct WorkflowGeneratorBuilder {
    config: GeneratorConfig,
    classifier: Option<Box<dyn Classifier>>,
    ids: Arc<dyn IdGenerator>,
    documentation: bool,
}

impl WorkflowGeneratorBuilder {
    pub fn new(config: GeneratorConfig) -> Self {
        let documentation = config.quality().required_documentation;
        Self {
            config,
            classifier: None,
            ids: Arc::new(UuidGenerator),
            documentation,
        }
    }

    /// Replaces the keyword classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_documentation(mut self, enabled: bool) -> Self {
        self.documentation = enabled;
        self
    }

    pub fn build(self) -> WorkflowGenerator {
        let classifier = self
            .classifier
            .unwrap_or_else(|| Box::new(KeywordClassifier::new(self.config.taxonomy().clone())));
        WorkflowGenerator {
            config: self.config,
            classifier,
            ids: self.ids,
            documentation: self.documentation,
        }
    }
}

impl WorkflowGenerator {
    pub fn builder(config: GeneratorConfig) -> WorkflowGeneratorBuilder {
        WorkflowGeneratorBuilder::new(config)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Turns a description into an annotated graph and its validation report.
    ///
    /// Never fails: anything wrong with the text shows up in the report.
    pub fn generate(&self, description: &str, context: &GenerationContext) -> GenerationOutcome {
        let classification = self.classifier.classify(description);
        let resolution = NodeResolver::new(&self.config).resolve(
            &classification,
            &context.parameters,
            &context.services,
        );

        let builder = GraphBuilder::new(&self.config, self.ids.as_ref());
        let name = self.config.naming().workflow_name(description);
        let mut graph = builder.build(&name, resolution.specs.clone());

        let doc_context = DocumentationContext {
            purpose: context.purpose.clone(),
            outcome: context.outcome.clone(),
            trigger: Some(classification.trigger),
            notes: context.notes.clone(),
        };

        // Both passes only read the graph.
        let (documentation, report) = if self.documentation {
            let (documentation, report) = rayon::join(
                || DocumentationSynthesizer::new(&self.config).annotate(&graph, &doc_context),
                || ValidationPipeline::new(&self.config).validate_resolution(&graph, &resolution),
            );
            (Some(documentation), report)
        } else {
            let report = ValidationPipeline::new(&self.config).validate_resolution(&graph, &resolution);
            (None, report)
        };

        if let Some(documentation) = &documentation {
            builder.attach_documentation(&mut graph, documentation);
        }

        info!(
            workflow = %graph.name,
            trigger = %classification.trigger,
            nodes = report.node_count,
            notes = graph.annotation_count(),
            passed = report.passed(),
            "generated workflow"
        );

        GenerationOutcome {
            classification,
            resolution,
            graph,
            documentation,
            report,
        }
    }

    /// Re-annotates an existing graph, replacing any notes it already has.
    pub fn annotate(&self, graph: &mut WorkflowGraph, context: &DocumentationContext) -> Documentation {
        let documentation = DocumentationSynthesizer::new(&self.config).annotate(graph, context);
        GraphBuilder::new(&self.config, self.ids.as_ref()).attach_documentation(graph, &documentation);
        documentation
    }

    /// Validates a graph without a resolution, e.g. one loaded from disk.
    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationReport {
        ValidationPipeline::new(&self.config).validate(graph)
    }
}
