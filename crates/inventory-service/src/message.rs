//! Messages exchanged between [`LedgerClient`](crate::client::LedgerClient)
//! and [`LedgerActor`](crate::actor::LedgerActor).
//!
//! Each request carries a oneshot responder; the actor answers every message
//! it dequeues. Business rejections ride inside the payload
//! ([`OperationOutcome`] with `success: false`), so responders carry plain
//! values — a failed send/receive on the channel itself is what maps to
//! [`LedgerError`](crate::error::LedgerError).

use inventory_ledger::{
    BulkReport, MovementEntry, OperationOutcome, StockKey, StockOperation, StockRecord,
};
use tokio::sync::oneshot;

/// One-shot responder for a ledger request.
pub type Respond<T> = oneshot::Sender<T>;

/// Requests understood by the ledger actor.
///
/// A closed enum rather than a stringly-typed action field: the compiler
/// enforces that the actor loop handles every operation.
#[derive(Debug)]
pub enum LedgerRequest {
    /// Apply one stock transition (add / reserve / release / confirm-sale).
    Apply {
        op: StockOperation,
        respond_to: Respond<OperationOutcome>,
    },
    /// Apply an ordered batch, item by item, collecting per-item outcomes.
    ApplyBulk {
        ops: Vec<StockOperation>,
        respond_to: Respond<BulkReport>,
    },
    /// Current state of one record.
    Status {
        key: StockKey,
        respond_to: Respond<Option<StockRecord>>,
    },
    /// Snapshot of records at or below their alert threshold.
    LowStock {
        respond_to: Respond<Vec<StockRecord>>,
    },
    /// Most-recent-first movement history.
    Movements {
        product_id: Option<String>,
        variant_id: Option<String>,
        limit: usize,
        respond_to: Respond<Vec<MovementEntry>>,
    },
}
