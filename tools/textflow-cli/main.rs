use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;
use textflow::prelude::*;
use tracing_subscriber::EnvFilter;

/// Generate a validated workflow graph from a plain-language description
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The automation to build, e.g. "Every day at 9am, fetch orders from the API"
    description: Option<String>,

    /// What the workflow is for, used in the generated description
    #[arg(long)]
    purpose: Option<String>,

    /// What the workflow produces, used in the generated description
    #[arg(long)]
    outcome: Option<String>,

    /// Extra service to call (repeatable), e.g. --service slack
    #[arg(long = "service")]
    services: Vec<String>,

    /// Parameter override as key.field=value (repeatable); values are parsed as JSON when possible
    #[arg(long = "param")]
    params: Vec<String>,

    /// Path to a JSON settings file; defaults to the built-in bundle
    #[arg(short, long)]
    config: Option<String>,

    /// Write the workflow JSON here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Use node-0001 style ids instead of UUIDs
    #[arg(long)]
    sequential_ids: bool,

    /// Skip the sticky-note documentation pass
    #[arg(long)]
    no_docs: bool,

    /// Print the validation report to stderr
    #[arg(long)]
    report: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.human {
        run_interactive(cli);
    } else {
        run_non_interactive(cli);
    }
}

fn run_generation(cli: &Cli, description: &str) {
    let start = Instant::now();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path),
        None => GeneratorConfig::standard(),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Invalid configuration: {}", e)));
    let indent = config.output().json_indentation;

    let mut builder = WorkflowGenerator::builder(config);
    if cli.sequential_ids {
        builder = builder.with_id_generator(Arc::new(SequentialIdGenerator::default()));
    }
    if cli.no_docs {
        builder = builder.with_documentation(false);
    }
    let generator = builder.build();

    let context = GenerationContext {
        purpose: cli.purpose.clone().unwrap_or_default(),
        outcome: cli.outcome.clone().unwrap_or_default(),
        services: cli.services.clone(),
        parameters: parse_overrides(&cli.params)
            .unwrap_or_else(|e| exit_with_error(&e)),
        ..GenerationContext::default()
    };

    let outcome = generator.generate(description, &context);
    let json = outcome
        .graph
        .to_json(indent)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    match &cli.output {
        Some(path) => {
            fs::write(path, &json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write workflow to '{}': {}", path, e))
            });
            eprintln!("Workflow written to {}", path);
        }
        None => println!("{}", json),
    }

    if cli.report {
        eprintln!("\n{}", ReportFormatter::format_report(&outcome.report));
        eprintln!("Generated in {:?}", start.elapsed());
    } else {
        eprintln!("{}", ReportFormatter::headline(&outcome.report));
    }

    if !outcome.is_executable() {
        std::process::exit(2);
    }
}

/// Parses `key.field=value` pairs into per-node parameter overrides.
fn parse_overrides(params: &[String]) -> std::result::Result<ParameterOverrides, String> {
    let mut overrides = ParameterOverrides::new();
    for param in params {
        let (path, raw) = param
            .split_once('=')
            .ok_or_else(|| format!("Parameter '{}' is not of the form key.field=value", param))?;
        let (key, field) = path
            .split_once('.')
            .ok_or_else(|| format!("Parameter '{}' is missing a '.field' part", param))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        overrides
            .entry(key.trim().to_string())
            .or_insert_with(Map::new)
            .insert(field.trim().to_string(), value);
    }
    Ok(overrides)
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let description = cli.description.clone().unwrap_or_else(|| {
        exit_with_error("A description is required in non-interactive mode.");
    });
    run_generation(&cli, &description);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(mut cli: Cli) {
    eprintln!("--- Textflow Interactive Mode ---");

    let description = prompt_for_input(
        "Describe the automation",
        cli.description.as_deref(),
    );
    if description.is_empty() {
        exit_with_error("A description is required.");
    }
    let purpose = prompt_for_input("What is it for? (optional)", cli.purpose.as_deref());
    if !purpose.is_empty() {
        cli.purpose = Some(purpose);
    }
    let output = prompt_for_input("Output file (optional, empty for stdout)", cli.output.as_deref());
    cli.output = (!output.is_empty()).then_some(output);
    cli.report = true;

    run_generation(&cli, &description);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    eprint!("> {}{}: ", prompt_text, default_prompt);
    io::stderr().flush().unwrap_or_else(|e| exit_with_error(&e.to_string()));

    io::stdin()
        .read_line(&mut line)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read line: {}", e)));
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
