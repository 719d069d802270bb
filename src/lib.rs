//! # Textflow - Text-to-Workflow Generation Engine
//!
//! **Textflow** turns a plain-language automation description into a structured
//! workflow graph (nodes, typed parameters and directed connections), annotates
//! it with generated documentation and checks it against structural and
//! completeness rules before it is handed to a workflow runtime.
//!
//! It is a small rule-based compiler: no language model, only keyword tables
//! and regular expressions, so the same description always yields the same
//! graph.
//!
//! ## Core Workflow
//!
//! 1.  **Configure**: Build a `GeneratorConfig` from the standard bundle or from a JSON file. Malformed configuration is the only hard failure.
//! 2.  **Classify**: A `Classifier` reads the description and detects the trigger, the action verbs, conditions and data operations.
//! 3.  **Resolve**: The `NodeResolver` maps each intent onto a node catalog entry and merges parameters.
//! 4.  **Build**: The `GraphBuilder` assigns ids and positions, wires the nodes and inserts error handlers.
//! 5.  **Annotate & Validate**: The `DocumentationSynthesizer` and `ValidationPipeline` both read the finished graph, in parallel.
//!
//! `WorkflowGenerator` runs all five steps.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = GeneratorConfig::standard()?;
//!     let generator = WorkflowGenerator::builder(config).build();
//!
//!     let context = GenerationContext {
//!         purpose: "sends a daily order summary".to_string(),
//!         ..GenerationContext::default()
//!     };
//!     let outcome = generator.generate(
//!         "Every day at 9am, fetch orders from the API and send a summary email",
//!         &context,
//!     );
//!
//!     println!("{}", ReportFormatter::format_report(&outcome.report));
//!     if outcome.is_executable() {
//!         println!("{}", outcome.graph.to_json_pretty()?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod docs;
pub mod error;
pub mod generator;
pub mod graph;
pub mod prelude;
pub mod resolver;
pub mod taxonomy;
pub mod validation;
