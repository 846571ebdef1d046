//! Rejection taxonomy for the transition engine.

use thiserror::Error;

/// Why a requested transition was refused.
///
/// These are business-level rejections, not system faults: the engine
/// renders them into an [`OperationOutcome`](crate::model::OperationOutcome)
/// message instead of propagating them as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Quantity must be strictly positive.
    #[error("invalid quantity: {0} (must be greater than zero)")]
    InvalidQuantity(u32),

    /// The request named no product.
    #[error("product id must not be empty")]
    MissingProductId,

    /// The requested reservation exceeds the sellable stock.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientAvailable { requested: u32, available: u32 },

    /// The requested release or sale exceeds the held stock (reservation not
    /// found or already released).
    #[error("insufficient reserved stock: requested {requested}, reserved {reserved}")]
    InsufficientReserved { requested: u32, reserved: u32 },
}
