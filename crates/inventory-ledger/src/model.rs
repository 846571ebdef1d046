//! Core data types for the stock ledger.
//!
//! A [`StockRecord`] tracks the three quantity buckets for one sellable item
//! (a product, optionally narrowed to a variant). A [`MovementEntry`] is one
//! line of the append-only audit trail; every successful transition writes
//! exactly one. [`StockOperation`] is the transient request shape handed to
//! the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identity of one stock record: a product, optionally narrowed to a variant.
///
/// Unique together; `variant_id = None` addresses the product-level record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub product_id: String,
    pub variant_id: Option<String>,
}

impl StockKey {
    pub fn new(product_id: impl Into<String>, variant_id: Option<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id,
        }
    }

    /// Key for a product-level record (no variant).
    pub fn product(product_id: impl Into<String>) -> Self {
        Self::new(product_id, None)
    }
}

impl Display for StockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variant_id {
            Some(variant) => write!(f, "{}/{}", self.product_id, variant),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// Durable per-(product, variant) quantity state.
///
/// Quantities are unsigned, so `available >= 0` and `reserved >= 0` hold by
/// construction. `sold` is cumulative and never decreases. `available` and
/// `reserved` are tracked independently; there is no combined lifetime cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: String,
    pub variant_id: Option<String>,
    /// Units sellable right now.
    pub available: u32,
    /// Units held against in-flight orders, not yet sold.
    pub reserved: u32,
    /// Cumulative units confirmed sold.
    pub sold: u32,
    /// Alert boundary: the record is low on stock when `available` falls to
    /// or below this value.
    pub low_stock_threshold: u32,
    pub updated_at: DateTime<Utc>,
}

impl StockRecord {
    /// Creates an empty record for `key`. Records are only ever created by
    /// the first `add` targeting a new key.
    pub fn new(key: &StockKey, low_stock_threshold: u32, now: DateTime<Utc>) -> Self {
        Self {
            product_id: key.product_id.clone(),
            variant_id: key.variant_id.clone(),
            available: 0,
            reserved: 0,
            sold: 0,
            low_stock_threshold,
            updated_at: now,
        }
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id.clone(), self.variant_id.clone())
    }

    pub fn is_low_stock(&self) -> bool {
        self.available <= self.low_stock_threshold
    }
}

/// The four stock-affecting operations a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockAction {
    Add,
    Reserve,
    Release,
    ConfirmSale,
}

impl Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Reserve => write!(f, "reserve"),
            Self::Release => write!(f, "release"),
            Self::ConfirmSale => write!(f, "confirm-sale"),
        }
    }
}

/// Classification of an applied movement, matching the operation that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Add,
    Reserve,
    Release,
    ConfirmSale,
}

impl MovementKind {
    /// Reason recorded when the caller supplies none.
    pub fn default_reason(self) -> &'static str {
        match self {
            Self::Add => "stock added",
            Self::Reserve => "stock reserved",
            Self::Release => "reservation released",
            Self::ConfirmSale => "sale confirmed",
        }
    }
}

impl From<StockAction> for MovementKind {
    fn from(action: StockAction) -> Self {
        match action {
            StockAction::Add => Self::Add,
            StockAction::Reserve => Self::Reserve,
            StockAction::Release => Self::Release,
            StockAction::ConfirmSale => Self::ConfirmSale,
        }
    }
}

impl Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Reserve => write!(f, "RESERVE"),
            Self::Release => write!(f, "RELEASE"),
            Self::ConfirmSale => write!(f, "CONFIRM_SALE"),
        }
    }
}

/// One line of the audit trail. Append-only: never mutated or deleted after
/// creation, and only the transition engine creates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEntry {
    pub id: u64,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub kind: MovementKind,
    pub quantity: u32,
    pub reason: String,
    /// External correlation id, e.g. an order id.
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MovementEntry {
    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id.clone(), self.variant_id.clone())
    }
}

/// One requested transition (transient, not persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOperation {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub action: StockAction,
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl StockOperation {
    pub fn new(action: StockAction, product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
            action,
            quantity,
            reason: None,
            reference: None,
        }
    }

    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id.clone(), self.variant_id.clone())
    }
}

/// Result of one requested transition.
///
/// Business rejections (validation or precondition failures) come back as
/// `success: false` with a descriptive message; they are not errors in the
/// `Result` sense and never unwind past the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

impl OperationOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Per-item failure inside a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkError {
    /// Position of the failed item in the submitted batch.
    pub index: usize,
    pub product_id: String,
    pub message: String,
}

/// Outcome of a bulk update: independent per-item results, never
/// all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Number of items applied successfully.
    pub processed: usize,
    pub errors: Vec<BulkError>,
}

impl BulkReport {
    pub fn fully_processed(&self) -> bool {
        self.errors.is_empty()
    }
}
