//! Message-to-transaction pipeline over external collaborators.
//!
//! Retrieval and persistence live outside this crate; they plug in through
//! [`MessageSource`] and [`TransactionStore`].

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::extraction::MessageExtractor;
use crate::models::message::RawMessage;
use crate::models::transaction::Transaction;

/// Yields raw messages awaiting processing.
pub trait MessageSource {
    /// Fetch pending messages.
    fn fetch(&mut self) -> Result<Vec<RawMessage>>;

    /// Mark a message as handled so it is not fetched again.
    fn mark_processed(&mut self, message_id: &str) -> Result<()>;
}

/// Accepts normalized transactions.
pub trait TransactionStore {
    fn store(&mut self, transaction: &Transaction) -> Result<()>;
}

/// Outcome counts of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Messages stored as transactions.
    pub processed: usize,
    /// Messages missing an amount or date.
    pub skipped: usize,
    /// Messages the store rejected.
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

/// Extract a transaction from one message, if it carries amount and date.
pub fn process_message<E>(extractor: &E, message: &RawMessage) -> Option<Transaction>
where
    E: MessageExtractor + ?Sized,
{
    let fields = extractor.extract_message(message);
    let transaction = Transaction::from_extraction(&fields);

    if transaction.is_none() {
        warn!(
            "Skipping message {} with missing data: {}",
            message.id.as_deref().unwrap_or("<no id>"),
            serde_json::to_string(&fields).unwrap_or_default()
        );
    }

    transaction
}

/// Fetch, extract, and store every pending message.
///
/// Messages without an amount or date are skipped and left unmarked. A
/// store failure is counted and processing continues with the next message.
/// Only a failed fetch aborts the run.
pub fn process_messages<S, T, E>(source: &mut S, store: &mut T, extractor: &E) -> Result<BatchReport>
where
    S: MessageSource + ?Sized,
    T: TransactionStore + ?Sized,
    E: MessageExtractor + ?Sized,
{
    let messages = source.fetch()?;
    let mut report = BatchReport::default();

    if messages.is_empty() {
        info!("No new messages to process");
        return Ok(report);
    }

    for message in &messages {
        let Some(transaction) = process_message(extractor, message) else {
            report.skipped += 1;
            continue;
        };

        if let Err(e) = store.store(&transaction) {
            error!(
                "Failed to store transaction for message {}: {}",
                message.id.as_deref().unwrap_or("<no id>"),
                e
            );
            report.failed += 1;
            continue;
        }

        report.processed += 1;

        if let Some(id) = message.id.as_deref() {
            if let Err(e) = source.mark_processed(id) {
                warn!("Failed to mark message {} as processed: {}", id, e);
            }
        }
    }

    debug!(
        "Batch finished: {} processed, {} skipped, {} failed",
        report.processed, report.skipped, report.failed
    );

    Ok(report)
}
