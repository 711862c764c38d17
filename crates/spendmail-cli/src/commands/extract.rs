//! Extract command - pull fields from a single raw message.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use spendmail_core::{ExtractionEngine, ExtractionResult, MessageExtractor, Transaction};

use super::{load_config, read_message};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Raw message JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also report the transaction built from the fields
    #[arg(long)]
    transaction: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let engine = ExtractionEngine::new(config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting from {}", args.input.display());

    let message = read_message(&args.input)?;
    let fields = engine.extract_message(&message);

    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.transaction {
        match Transaction::from_extraction(&fields) {
            Some(t) => eprintln!(
                "{} Transaction: {} {} at {}",
                style("ℹ").blue(),
                t.category,
                t.amount,
                t.timestamp
            ),
            None => eprintln!(
                "{} No transaction: amount or date missing",
                style("!").yellow()
            ),
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_fields(fields: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(fields.iter().map(|(name, _)| name))?;
    wtr.write_record(fields.iter().map(|(_, value)| {
        if value.is_null() {
            String::new()
        } else {
            value.to_string()
        }
    }))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &ExtractionResult) -> String {
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    fields
        .iter()
        .map(|(name, value)| format!("{:<width$}  {}", format!("{}:", name), value, width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
