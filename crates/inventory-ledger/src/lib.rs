//! # Inventory Ledger — domain core
//!
//! Pure, synchronous stock accounting: per-(product, variant) quantity state,
//! a transition engine with a closed set of operations, and an append-only
//! movement log forming the audit trail.
//!
//! ## Layers
//!
//! - [`model`] — the data types: [`StockRecord`], [`MovementEntry`], the
//!   [`StockAction`] operation set, and the request/outcome shapes.
//! - [`engine`] — [`StockBook`], the only writer: validate, apply, log.
//! - [`ledger`] — [`MovementLog`], the append-only history with filtered,
//!   most-recent-first queries.
//! - [`error`] — the [`Rejection`] taxonomy for refused transitions.
//!
//! ## The ledger invariant
//!
//! Every state change has exactly one corresponding movement entry, and
//! rejected requests have none. That holds because all writes route through
//! [`StockBook::apply`]; nothing else mutates a record or appends to the log.
//!
//! This crate has no async and no I/O. Making concurrent use safe — so two
//! callers racing on one key cannot both pass the same precondition check —
//! belongs to whoever owns the [`StockBook`]; the companion service crate
//! does it by confining the book to a single actor task.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod model;

pub use engine::StockBook;
pub use error::Rejection;
pub use ledger::MovementLog;
pub use model::{
    BulkError, BulkReport, MovementEntry, MovementKind, OperationOutcome, StockAction, StockKey,
    StockOperation, StockRecord,
};
