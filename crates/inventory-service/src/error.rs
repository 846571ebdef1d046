//! Service-level errors.
//!
//! Business rejections (insufficient stock, bad quantity) are NOT errors
//! here — they travel inside [`OperationOutcome`](inventory_ledger::OperationOutcome)
//! with `success: false`. This enum covers the system faults around them.

use thiserror::Error;

/// Errors surfaced by [`LedgerClient`](crate::client::LedgerClient) calls.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger actor is gone and the request channel is closed. This is
    /// the unreachable-backing-store class: the only one a caller may
    /// sensibly retry.
    #[error("ledger unavailable: request channel closed")]
    Unavailable,

    /// The actor accepted the request but dropped the response channel.
    #[error("ledger unavailable: response channel dropped")]
    ResponseDropped,

    /// No stock record exists for the requested key.
    #[error("no stock record for {0}")]
    NotFound(String),
}

impl LedgerError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable | Self::ResponseDropped)
    }
}
