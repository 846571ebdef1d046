//! Transition engine: validates and applies stock movements.
//!
//! [`StockBook`] owns all stock records plus the movement log, and is the
//! only writer of either. Every mutation goes through [`StockBook::apply`],
//! which enforces the transition table for a single unit of stock:
//!
//! ```text
//! AVAILABLE --reserve--> RESERVED --confirm-sale--> SOLD (terminal)
//!     ^                      |
//!     +------release---------+
//! ```
//!
//! Units enter `AVAILABLE` only via `add`. A successful apply mutates the
//! record and appends exactly one movement entry; a rejection touches
//! nothing and logs nothing.
//!
//! The book itself is synchronous and not thread-safe. Serializing access —
//! so two concurrent reserves cannot both read the same stale `available` —
//! is the owner's job; the service crate does it by giving the book to a
//! single actor task.

use crate::error::Rejection;
use crate::ledger::MovementLog;
use crate::model::{
    BulkError, BulkReport, MovementEntry, MovementKind, OperationOutcome, StockAction, StockKey,
    StockOperation, StockRecord,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// All stock records plus their audit trail.
#[derive(Debug)]
pub struct StockBook {
    records: HashMap<StockKey, StockRecord>,
    log: MovementLog,
    default_low_stock_threshold: u32,
}

impl StockBook {
    pub fn new(default_low_stock_threshold: u32) -> Self {
        Self {
            records: HashMap::new(),
            log: MovementLog::new(),
            default_low_stock_threshold,
        }
    }

    /// Validates and applies one transition.
    ///
    /// Returns `success: true` and appends one movement entry when the
    /// precondition holds. Returns `success: false` with a descriptive
    /// message — and leaves both the record and the log untouched — when it
    /// does not. Rejections are terminal business outcomes, not faults to
    /// retry.
    pub fn apply(&mut self, op: &StockOperation, now: DateTime<Utc>) -> OperationOutcome {
        match self.try_apply(op, now) {
            Ok(message) => OperationOutcome::accepted(message),
            Err(rejection) => {
                debug!(key = %op.key(), action = %op.action, %rejection, "rejected");
                OperationOutcome::rejected(rejection.to_string())
            }
        }
    }

    fn try_apply(&mut self, op: &StockOperation, now: DateTime<Utc>) -> Result<String, Rejection> {
        if op.product_id.trim().is_empty() {
            return Err(Rejection::MissingProductId);
        }
        if op.quantity == 0 {
            return Err(Rejection::InvalidQuantity(op.quantity));
        }

        let key = op.key();
        let quantity = op.quantity;
        let threshold = self.default_low_stock_threshold;

        let message = match op.action {
            StockAction::Add => {
                let record = self
                    .records
                    .entry(key.clone())
                    .or_insert_with(|| StockRecord::new(&key, threshold, now));
                record.available += quantity;
                record.updated_at = now;
                format!("added {quantity} unit(s) to {key}")
            }
            StockAction::Reserve => {
                let record = self.record_mut(&key).ok_or(Rejection::InsufficientAvailable {
                    requested: quantity,
                    available: 0,
                })?;
                if record.available < quantity {
                    return Err(Rejection::InsufficientAvailable {
                        requested: quantity,
                        available: record.available,
                    });
                }
                record.available -= quantity;
                record.reserved += quantity;
                record.updated_at = now;
                format!("reserved {quantity} unit(s) of {key}")
            }
            StockAction::Release => {
                let record = self.record_mut(&key).ok_or(Rejection::InsufficientReserved {
                    requested: quantity,
                    reserved: 0,
                })?;
                if record.reserved < quantity {
                    return Err(Rejection::InsufficientReserved {
                        requested: quantity,
                        reserved: record.reserved,
                    });
                }
                record.reserved -= quantity;
                record.available += quantity;
                record.updated_at = now;
                format!("released {quantity} unit(s) of {key}")
            }
            StockAction::ConfirmSale => {
                let record = self.record_mut(&key).ok_or(Rejection::InsufficientReserved {
                    requested: quantity,
                    reserved: 0,
                })?;
                if record.reserved < quantity {
                    return Err(Rejection::InsufficientReserved {
                        requested: quantity,
                        reserved: record.reserved,
                    });
                }
                record.reserved -= quantity;
                record.sold += quantity;
                record.updated_at = now;
                format!("confirmed sale of {quantity} unit(s) of {key}")
            }
        };

        let kind = MovementKind::from(op.action);
        let reason = op
            .reason
            .clone()
            .unwrap_or_else(|| kind.default_reason().to_string());
        self.log
            .record(&key, kind, quantity, reason, op.reference.clone(), now);

        Ok(message)
    }

    /// Applies each item of an ordered batch independently, in order.
    ///
    /// This is deliberately NOT all-or-nothing: one item's rejection neither
    /// aborts nor rolls back its siblings, and an earlier item's effect is
    /// visible to later items targeting the same key. Callers that need
    /// batch atomicity must wrap the whole batch at a higher layer.
    pub fn apply_bulk(&mut self, ops: &[StockOperation], now: DateTime<Utc>) -> BulkReport {
        let mut processed = 0;
        let mut errors = Vec::new();
        for (index, op) in ops.iter().enumerate() {
            let outcome = self.apply(op, now);
            if outcome.success {
                processed += 1;
            } else {
                errors.push(BulkError {
                    index,
                    product_id: op.product_id.clone(),
                    message: outcome.message,
                });
            }
        }
        BulkReport { processed, errors }
    }

    /// Current state of one record, if any `add` ever created it.
    pub fn status(&self, key: &StockKey) -> Option<&StockRecord> {
        self.records.get(key)
    }

    /// Point-in-time snapshot of every record at or below its alert
    /// threshold, most urgent (lowest `available`) first.
    pub fn low_stock(&self) -> Vec<&StockRecord> {
        let mut hits: Vec<&StockRecord> = self
            .records
            .values()
            .filter(|record| record.is_low_stock())
            .collect();
        hits.sort_by_key(|record| record.available);
        hits
    }

    /// Most-recent-first movement history, optionally filtered, capped at
    /// `limit`.
    pub fn movements(
        &self,
        product_id: Option<&str>,
        variant_id: Option<&str>,
        limit: usize,
    ) -> Vec<&MovementEntry> {
        self.log.query(product_id, variant_id, limit)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn movement_count(&self) -> usize {
        self.log.len()
    }

    fn record_mut(&mut self, key: &StockKey) -> Option<&mut StockRecord> {
        self.records.get_mut(key)
    }
}
