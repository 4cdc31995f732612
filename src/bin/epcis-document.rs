//! EPCIS Document CLI
//!
//! Command-line interface for validating and inspecting EPCIS documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use epcis_document::{
    load_document, DocumentType, DocumentValidator, EventType, FieldSetRegistry, ValidationError,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "epcis-document")]
#[command(about = "Validate and inspect EPCIS 2.0 documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document: structural schemas plus extension namespaces
    Validate {
        /// Document file to validate
        document: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Suppress the per-violation listing, only report the outcome
        #[arg(long, short)]
        quiet: bool,
    },

    /// Resolve a document's type and summarize its events
    Inspect {
        /// Document file to inspect
        document: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            document,
            json,
            quiet,
        } => run_validate(&document, json, quiet),
        Commands::Inspect { document } => run_inspect(&document),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_validate(path: &Path, json_output: bool, quiet: bool) -> Result<(), u8> {
    let document = load_document(path).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let validator = DocumentValidator::new();
    let report = validator.validate(&document).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    if report.success() {
        if json_output {
            println!(r#"{{"valid":true}}"#);
        } else {
            println!("\x1b[32m✓ {} is valid\x1b[0m", path.display());
        }
        Ok(())
    } else {
        if json_output {
            let output = serde_json::json!({
                "valid": false,
                "violations": report.violations
            });
            println!("{}", output);
        } else {
            eprintln!(
                "\x1b[31m✗ {} failed with {} violation(s)\x1b[0m",
                path.display(),
                report.violations.len()
            );
            if !quiet {
                for violation in &report.violations {
                    eprintln!("  {}", violation);
                }
            }
        }
        Err(1)
    }
}

fn run_inspect(path: &Path) -> Result<(), u8> {
    let document = load_document(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let doc_type = DocumentType::resolve(&document).map_err(|found| {
        let err = ValidationError::UnknownDocumentType { found };
        eprintln!("Error: {}", err);
        err.exit_code() as u8
    })?;

    println!("type:          {}", doc_type.name());
    if let Some(version) = document.get("schemaVersion").and_then(Value::as_str) {
        println!("schemaVersion: {}", version);
    }
    if let Some(date) = document.get("creationDate").and_then(Value::as_str) {
        println!("creationDate:  {}", date);
    }

    let events = collect_events(&document);
    println!("events:        {}", events.len());

    let field_sets = FieldSetRegistry::standard();
    for (i, event) in events.iter().enumerate() {
        match EventType::resolve(event) {
            Ok(event_type) => {
                let extensions = field_sets
                    .ensure_field_set(event, event_type.name())
                    .map(|p| p.foreign.len())
                    .unwrap_or(0);
                println!(
                    "  [{}] {} ({} extension field(s))",
                    i,
                    event_type.name(),
                    extensions
                );
            }
            Err(found) => {
                println!("  [{}] unrecognized event type: {}", i, found);
            }
        }
    }

    Ok(())
}

/// Events in the body, singular or plural form. An empty singular `event`
/// object is the zero-event serialization.
fn collect_events(document: &Value) -> Vec<&Value> {
    let mut events = Vec::new();
    let Some(body) = document.get("epcisBody") else {
        return events;
    };
    if let Some(event) = body.get("event") {
        let is_empty = event.as_object().map(|m| m.is_empty()).unwrap_or(false);
        if !is_empty {
            events.push(event);
        }
    }
    if let Some(Value::Array(items)) = body.get("eventList") {
        events.extend(items.iter());
    }
    events
}

fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!(
            "{}",
            serde_json::json!({ "valid": false, "error": msg })
        );
    } else {
        eprintln!("Error: {}", msg);
    }
}
