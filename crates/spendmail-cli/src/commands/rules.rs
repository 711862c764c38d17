//! Rules command - inspect the field namespace and how each field resolves.

use clap::Args;
use console::style;
use serde::Serialize;

use spendmail_core::ExtractionEngine;

use super::load_config;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error when any rule is invalid
    #[arg(long)]
    check: bool,
}

#[derive(Serialize)]
struct FieldReport {
    field: String,
    operator_rule: bool,
    processor: Option<String>,
    error: Option<String>,
}

pub fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = ExtractionEngine::new(config)?;

    let fields: Vec<FieldReport> = engine
        .field_names()
        .map(|field| {
            let resolved = engine.resolve(field);
            FieldReport {
                field: field.to_string(),
                operator_rule: engine.rules().contains(field),
                processor: resolved.as_ref().ok().map(ToString::to_string),
                error: resolved.err().map(|e| e.to_string()),
            }
        })
        .collect();

    let problems = engine.rules().problems();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        println!("Convention: {:?}", engine.rules().case_convention());
        println!();

        let width = fields.iter().map(|f| f.field.len()).max().unwrap_or(0);
        for f in &fields {
            let origin = if f.operator_rule { "custom" } else { "built-in" };
            match (&f.processor, &f.error) {
                (Some(processor), _) => println!(
                    "  {:<width$}  {}  {}",
                    f.field,
                    style(processor).green(),
                    style(origin).dim(),
                    width = width
                ),
                (None, error) => println!(
                    "  {:<width$}  {}",
                    f.field,
                    style(error.as_deref().unwrap_or("unresolved")).red(),
                    width = width
                ),
            }
        }
    }

    if !problems.is_empty() {
        eprintln!();
        eprintln!("{}", style("Invalid rules:").yellow());
        for problem in &problems {
            eprintln!("  - {}", problem);
        }

        if args.check {
            anyhow::bail!("{} invalid rules", problems.len());
        }
    }

    Ok(())
}
