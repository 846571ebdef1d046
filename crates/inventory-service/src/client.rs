//! Client handle for the ledger actor.
//!
//! [`LedgerClient`] hides the message passing behind ordinary async methods.
//! It holds only an mpsc sender, so cloning is cheap and clones can be
//! handed to any task that needs to talk to the ledger.

use crate::error::LedgerError;
use crate::message::LedgerRequest;
use inventory_ledger::{
    BulkReport, MovementEntry, OperationOutcome, StockAction, StockKey, StockOperation, StockRecord,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Type-safe, cloneable interface to the [`LedgerActor`](crate::actor::LedgerActor).
#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
}

impl LedgerClient {
    pub fn new(sender: mpsc::Sender<LedgerRequest>) -> Self {
        Self { sender }
    }

    async fn send<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> LedgerRequest,
    ) -> Result<T, LedgerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| LedgerError::Unavailable)?;
        response.await.map_err(|_| LedgerError::ResponseDropped)
    }

    /// Applies one transition and returns its business outcome.
    ///
    /// `Ok` with `success: false` is a rejection (insufficient stock, bad
    /// quantity); `Err` means the ledger itself was unreachable.
    #[instrument(skip(self))]
    pub async fn apply(&self, op: StockOperation) -> Result<OperationOutcome, LedgerError> {
        debug!("Sending request");
        self.send(|respond_to| LedgerRequest::Apply { op, respond_to })
            .await
    }

    /// Adds sellable units, creating the record on first use.
    #[instrument(skip(self))]
    pub async fn add_stock(
        &self,
        key: StockKey,
        quantity: u32,
        reason: Option<String>,
    ) -> Result<OperationOutcome, LedgerError> {
        let mut op = StockOperation::new(StockAction::Add, key.product_id, quantity);
        op.variant_id = key.variant_id;
        op.reason = reason;
        self.apply(op).await
    }

    /// Holds units against an in-flight order.
    #[instrument(skip(self))]
    pub async fn reserve_stock(
        &self,
        key: StockKey,
        quantity: u32,
        reference: Option<String>,
    ) -> Result<OperationOutcome, LedgerError> {
        let mut op = StockOperation::new(StockAction::Reserve, key.product_id, quantity);
        op.variant_id = key.variant_id;
        op.reference = reference;
        self.apply(op).await
    }

    /// Returns held units to the sellable pool.
    #[instrument(skip(self))]
    pub async fn release_stock(
        &self,
        key: StockKey,
        quantity: u32,
        reference: Option<String>,
    ) -> Result<OperationOutcome, LedgerError> {
        let mut op = StockOperation::new(StockAction::Release, key.product_id, quantity);
        op.variant_id = key.variant_id;
        op.reference = reference;
        self.apply(op).await
    }

    /// Converts held units into confirmed sales.
    #[instrument(skip(self))]
    pub async fn confirm_sale(
        &self,
        key: StockKey,
        quantity: u32,
        reference: Option<String>,
    ) -> Result<OperationOutcome, LedgerError> {
        let mut op = StockOperation::new(StockAction::ConfirmSale, key.product_id, quantity);
        op.variant_id = key.variant_id;
        op.reference = reference;
        self.apply(op).await
    }

    /// Applies an ordered batch item by item; one item's rejection never
    /// rolls back its siblings.
    #[instrument(skip(self, ops), fields(items = ops.len()))]
    pub async fn bulk_update(&self, ops: Vec<StockOperation>) -> Result<BulkReport, LedgerError> {
        debug!("Sending request");
        self.send(|respond_to| LedgerRequest::ApplyBulk { ops, respond_to })
            .await
    }

    /// Current state of one record; `NotFound` if no `add` ever created it.
    #[instrument(skip(self))]
    pub async fn status(&self, key: StockKey) -> Result<StockRecord, LedgerError> {
        debug!("Sending request");
        let display = key.to_string();
        self.send(|respond_to| LedgerRequest::Status { key, respond_to })
            .await?
            .ok_or(LedgerError::NotFound(display))
    }

    /// Records at or below their alert threshold, most urgent first.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<StockRecord>, LedgerError> {
        debug!("Sending request");
        self.send(|respond_to| LedgerRequest::LowStock { respond_to })
            .await
    }

    /// Most-recent-first movement history, optionally filtered, capped at
    /// `limit`.
    #[instrument(skip(self))]
    pub async fn movements(
        &self,
        product_id: Option<String>,
        variant_id: Option<String>,
        limit: usize,
    ) -> Result<Vec<MovementEntry>, LedgerError> {
        debug!("Sending request");
        self.send(|respond_to| LedgerRequest::Movements {
            product_id,
            variant_id,
            limit,
            respond_to,
        })
        .await
    }
}
