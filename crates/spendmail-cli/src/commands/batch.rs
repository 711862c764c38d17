//! Batch command - turn a directory of raw messages into transactions.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use spendmail_core::{
    process_messages, ExtractionEngine, ExtractionResult, MessageExtractor, MessageSource,
    RawMessage, Transaction, TransactionStore,
};

use super::read_message;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching raw message JSON files
    #[arg(required = true)]
    input: String,

    /// Transactions output file
    #[arg(short, long, default_value = "transactions.jsonl")]
    output: PathBuf,

    /// Transactions output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    format: StoreFormat,

    /// Also write a per-file summary CSV next to the output
    #[arg(long)]
    summary: bool,

    /// Continue past unreadable files and rejected transactions
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StoreFormat {
    /// One JSON object per line
    Jsonl,
    /// CSV with a header row
    Csv,
}

/// Raw messages read from files. Messages without an id take the file stem.
struct FileSource {
    files: Vec<PathBuf>,
    continue_on_error: bool,
    unreadable: Vec<(PathBuf, String)>,
    ids: Vec<(PathBuf, String)>,
    processed: BTreeSet<String>,
}

impl FileSource {
    fn new(files: Vec<PathBuf>, continue_on_error: bool) -> Self {
        Self {
            files,
            continue_on_error,
            unreadable: Vec::new(),
            ids: Vec::new(),
            processed: BTreeSet::new(),
        }
    }
}

impl MessageSource for FileSource {
    fn fetch(&mut self) -> spendmail_core::Result<Vec<RawMessage>> {
        let mut messages = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let mut message = match read_message(path) {
                Ok(message) => message,
                Err(e) if self.continue_on_error => {
                    warn!("Skipping unreadable file {}: {:#}", path.display(), e);
                    self.unreadable.push((path.clone(), format!("{:#}", e)));
                    continue;
                }
                Err(e) => return Err(io::Error::other(format!("{:#}", e)).into()),
            };

            if message.id.is_none() {
                message.id = Some(file_id(path));
            }
            if let Some(id) = &message.id {
                self.ids.push((path.clone(), id.clone()));
            }
            messages.push(message);
        }

        Ok(messages)
    }

    fn mark_processed(&mut self, message_id: &str) -> spendmail_core::Result<()> {
        self.processed.insert(message_id.to_string());
        Ok(())
    }
}

fn file_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("message")
        .to_string()
}

/// Transactions appended to a single output file.
enum FileStore {
    Jsonl(BufWriter<File>),
    Csv(csv::Writer<File>),
}

impl FileStore {
    fn create(path: &Path, format: StoreFormat) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = match format {
            StoreFormat::Jsonl => Self::Jsonl(BufWriter::new(File::create(path)?)),
            StoreFormat::Csv => Self::Csv(csv::Writer::from_path(path)?),
        };
        Ok(store)
    }

    fn finish(self) -> anyhow::Result<()> {
        match self {
            Self::Jsonl(mut w) => w.flush()?,
            Self::Csv(mut w) => w.flush()?,
        }
        Ok(())
    }
}

impl TransactionStore for FileStore {
    fn store(&mut self, transaction: &Transaction) -> spendmail_core::Result<()> {
        match self {
            Self::Jsonl(w) => {
                serde_json::to_writer(&mut *w, transaction)?;
                w.write_all(b"\n")?;
            }
            Self::Csv(w) => w.serialize(transaction).map_err(io::Error::from)?,
        }
        Ok(())
    }
}

/// Extractor that advances a progress bar per message.
struct Tracked<'a> {
    engine: &'a ExtractionEngine,
    pb: &'a ProgressBar,
}

impl MessageExtractor for Tracked<'_> {
    fn extract_text(&self, body: &str) -> ExtractionResult {
        self.engine.extract_text(body)
    }

    fn extract_message(&self, message: &RawMessage) -> ExtractionResult {
        if let Some(id) = &message.id {
            self.pb.set_message(id.clone());
        }
        let result = self.engine.extract_message(message);
        self.pb.inc(1);
        result
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let engine = ExtractionEngine::new(config)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} messages to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut source = FileSource::new(files, args.continue_on_error);
    let mut store = FileStore::create(&args.output, args.format)?;
    let tracked = Tracked {
        engine: &engine,
        pb: &pb,
    };

    let report = process_messages(&mut source, &mut store, &tracked)?;
    store.finish()?;

    pb.finish_with_message("Complete");
    debug!("Wrote transactions to {}", args.output.display());

    if args.summary {
        let summary_path = args.output.with_file_name("summary.csv");
        write_summary(&summary_path, &source)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} messages in {:?}",
        style("✓").green(),
        report.total() + source.unreadable.len(),
        start.elapsed()
    );
    println!(
        "   {} stored, {} skipped, {} failed",
        style(report.processed).green(),
        style(report.skipped).yellow(),
        style(report.failed + source.unreadable.len()).red()
    );

    if !source.unreadable.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for (path, error) in &source.unreadable {
            println!("  - {}: {}", path.display(), error);
        }
    }

    if report.failed > 0 && !args.continue_on_error {
        anyhow::bail!("{} transactions could not be stored", report.failed);
    }

    Ok(())
}

fn write_summary(path: &Path, source: &FileSource) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "message_id", "status", "error"])?;

    for (file, id) in &source.ids {
        let status = if source.processed.contains(id) {
            "stored"
        } else {
            "not stored"
        };
        wtr.write_record([display_name(file), id.as_str(), status, ""])?;
    }

    for (file, error) in &source.unreadable {
        wtr.write_record([display_name(file), "", "unreadable", error.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}
