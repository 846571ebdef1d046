//! Append-only movement log.
//!
//! Every applied transition leaves exactly one [`MovementEntry`] here;
//! rejected requests leave none. Entries are never mutated or deleted, so
//! the log is a complete, replayable audit trail for reconciliation.

use crate::model::{MovementEntry, MovementKind, StockKey};
use chrono::{DateTime, Utc};

/// Ordered history of applied stock movements.
#[derive(Debug, Default)]
pub struct MovementLog {
    entries: Vec<MovementEntry>,
    next_id: u64,
}

impl MovementLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends one entry and returns its id. Only the transition engine
    /// calls this, and only after a successful apply.
    pub fn record(
        &mut self,
        key: &StockKey,
        kind: MovementKind,
        quantity: u32,
        reason: String,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(MovementEntry {
            id,
            product_id: key.product_id.clone(),
            variant_id: key.variant_id.clone(),
            kind,
            quantity,
            reason,
            reference,
            created_at: now,
        });
        id
    }

    /// Most-recent-first view, optionally filtered by product and/or
    /// variant, capped at `limit` entries.
    pub fn query(
        &self,
        product_id: Option<&str>,
        variant_id: Option<&str>,
        limit: usize,
    ) -> Vec<&MovementEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| product_id.map_or(true, |p| entry.product_id == p))
            .filter(|entry| variant_id.map_or(true, |v| entry.variant_id.as_deref() == Some(v)))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
