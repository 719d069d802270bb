//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the textflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use textflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let config = GeneratorConfig::from_file("path/to/settings.json")?;
//! let generator = WorkflowGenerator::builder(config)
//!     .with_id_generator(std::sync::Arc::new(SequentialIdGenerator::default()))
//!     .build();
//!
//! let outcome = generator.generate("When a webhook arrives, notify slack", &GenerationContext::default());
//! for failure in outcome.report.failures() {
//!     println!("{}: {}", failure.rule_id, failure.message);
//! }
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::generator::{GenerationContext, GenerationOutcome, WorkflowGenerator};

// Stages
pub use crate::classifier::{ClassificationResult, Classifier, KeywordClassifier};
pub use crate::docs::{Documentation, DocumentationContext, DocumentationSynthesizer};
pub use crate::graph::{GraphBuilder, IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use crate::resolver::{NodeResolver, NodeSpec, ParameterOverrides, Resolution};
pub use crate::validation::{ValidationPipeline, ValidationReport};

// Data model
pub use crate::catalog::NodeRole;
pub use crate::graph::{PlacedNode, WorkflowGraph};
pub use crate::taxonomy::TriggerType;
pub use crate::validation::{RuleId, RuleResult};

// Configuration
pub use crate::config::{GeneratorConfig, GeneratorSettings};

// Error types
pub use crate::error::{ConfigError, GraphIoError};

// Report formatting
pub use crate::validation::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
