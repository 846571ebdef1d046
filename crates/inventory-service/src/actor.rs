//! The ledger actor.
//!
//! [`LedgerActor`] owns the [`StockBook`] and processes requests one at a
//! time from an mpsc channel. That sequential loop is the concurrency
//! guard the reservation semantics need: a read-modify-write like "reserve 4
//! if available >= 4" executes to completion before the next request is
//! dequeued, so two callers racing on the same key can never both observe a
//! stale `available` and both succeed when only one should. Exclusive
//! ownership of the book by this task makes the discipline compile-enforced
//! rather than convention.
//!
//! Requests either complete or come back rejected; there is no timeout,
//! cancellation, or automatic retry here.

use crate::client::LedgerClient;
use crate::config::LedgerConfig;
use crate::message::LedgerRequest;
use chrono::Utc;
use inventory_ledger::StockBook;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns all stock state and serializes every operation against it.
pub struct LedgerActor {
    receiver: mpsc::Receiver<LedgerRequest>,
    book: StockBook,
}

impl LedgerActor {
    /// Creates the actor and its client.
    ///
    /// The actor must be driven via [`run`](Self::run) (usually
    /// `tokio::spawn(actor.run())`); the client can be cloned freely and
    /// shared across tasks.
    pub fn new(config: &LedgerConfig) -> (Self, LedgerClient) {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            receiver,
            book: StockBook::new(config.default_low_stock_threshold),
        };
        (actor, LedgerClient::new(sender))
    }

    /// Event loop: processes requests until every client is dropped and the
    /// channel closes.
    pub async fn run(mut self) {
        info!("Ledger actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LedgerRequest::Apply { op, respond_to } => {
                    debug!(key = %op.key(), action = %op.action, quantity = op.quantity, "Apply");
                    let outcome = self.book.apply(&op, Utc::now());
                    if outcome.success {
                        info!(key = %op.key(), action = %op.action, quantity = op.quantity, "Applied");
                    } else {
                        warn!(key = %op.key(), action = %op.action, reason = %outcome.message, "Rejected");
                    }
                    let _ = respond_to.send(outcome);
                }
                LedgerRequest::ApplyBulk { ops, respond_to } => {
                    debug!(items = ops.len(), "ApplyBulk");
                    let report = self.book.apply_bulk(&ops, Utc::now());
                    info!(
                        processed = report.processed,
                        failed = report.errors.len(),
                        "Bulk update finished"
                    );
                    let _ = respond_to.send(report);
                }
                LedgerRequest::Status { key, respond_to } => {
                    let record = self.book.status(&key).cloned();
                    debug!(%key, found = record.is_some(), "Status");
                    let _ = respond_to.send(record);
                }
                LedgerRequest::LowStock { respond_to } => {
                    let hits: Vec<_> = self.book.low_stock().into_iter().cloned().collect();
                    debug!(hits = hits.len(), "LowStock");
                    let _ = respond_to.send(hits);
                }
                LedgerRequest::Movements {
                    product_id,
                    variant_id,
                    limit,
                    respond_to,
                } => {
                    let entries: Vec<_> = self
                        .book
                        .movements(product_id.as_deref(), variant_id.as_deref(), limit)
                        .into_iter()
                        .cloned()
                        .collect();
                    debug!(returned = entries.len(), limit, "Movements");
                    let _ = respond_to.send(entries);
                }
            }
        }

        info!(
            records = self.book.record_count(),
            movements = self.book.movement_count(),
            "Ledger actor shutdown"
        );
    }
}
