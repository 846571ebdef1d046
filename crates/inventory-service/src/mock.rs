//! Mock ledger client for tests.
//!
//! Two styles, mirroring how the layers above the client are tested:
//!
//! - [`MockLedgerClient`] — fluent expectations: queue up responses, hand
//!   out a real [`LedgerClient`], then [`verify`](MockLedgerClient::verify)
//!   that everything queued was consumed. Good for testing api/orchestration
//!   logic without spawning the actor.
//! - Raw channel helpers ([`create_mock_client`], [`expect_apply`], …) —
//!   inspect the exact request the client sent and answer it by hand. Good
//!   for testing the client wrapper itself.
//!
//! Deterministic and in-memory; no actor task, no real state. To simulate
//! an unreachable ledger, use [`closed_client`].

use crate::client::LedgerClient;
use crate::message::{LedgerRequest, Respond};
use inventory_ledger::{
    BulkReport, MovementEntry, OperationOutcome, StockKey, StockOperation, StockRecord,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Queued response for one expected request.
enum Expectation {
    Apply {
        outcome: OperationOutcome,
    },
    ApplyBulk {
        report: BulkReport,
    },
    Status {
        key: StockKey,
        record: Option<StockRecord>,
    },
    LowStock {
        records: Vec<StockRecord>,
    },
    Movements {
        entries: Vec<MovementEntry>,
    },
}

/// A mock with expectation tracking.
///
/// # Example
/// ```ignore
/// let mut mock = MockLedgerClient::new();
/// mock.expect_apply().return_outcome(OperationOutcome::accepted("ok"));
/// let client = mock.client();
/// // drive the code under test with `client` ...
/// mock.verify();
/// ```
pub struct MockLedgerClient {
    client: LedgerClient,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedgerClient {
    /// Creates a mock with no expectations. Must be called from within a
    /// tokio runtime (it spawns the responder task).
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<LedgerRequest>(100);
        let expectations: Arc<Mutex<VecDeque<Expectation>>> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();
                match (request, expectation) {
                    (
                        LedgerRequest::Apply { respond_to, .. },
                        Some(Expectation::Apply { outcome }),
                    ) => {
                        let _ = respond_to.send(outcome);
                    }
                    (
                        LedgerRequest::ApplyBulk { respond_to, .. },
                        Some(Expectation::ApplyBulk { report }),
                    ) => {
                        let _ = respond_to.send(report);
                    }
                    (
                        LedgerRequest::Status { key, respond_to },
                        Some(Expectation::Status { key: expected, record }),
                    ) => {
                        assert_eq!(key, expected, "Status requested for unexpected key");
                        let _ = respond_to.send(record);
                    }
                    (
                        LedgerRequest::LowStock { respond_to },
                        Some(Expectation::LowStock { records }),
                    ) => {
                        let _ = respond_to.send(records);
                    }
                    (
                        LedgerRequest::Movements { respond_to, .. },
                        Some(Expectation::Movements { entries }),
                    ) => {
                        let _ = respond_to.send(entries);
                    }
                    _ => panic!("Unexpected request or expectation mismatch"),
                }
            }
        });

        Self {
            client: LedgerClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// A real client wired to this mock.
    pub fn client(&self) -> LedgerClient {
        self.client.clone()
    }

    pub fn expect_apply(&mut self) -> ApplyExpectation<'_> {
        ApplyExpectation { mock: self }
    }

    pub fn expect_bulk(&mut self) -> BulkExpectation<'_> {
        BulkExpectation { mock: self }
    }

    pub fn expect_status(&mut self, key: StockKey) -> StatusExpectation<'_> {
        StatusExpectation { mock: self, key }
    }

    pub fn expect_low_stock(&mut self) -> LowStockExpectation<'_> {
        LowStockExpectation { mock: self }
    }

    pub fn expect_movements(&mut self) -> MovementsExpectation<'_> {
        MovementsExpectation { mock: self }
    }

    /// Panics if any queued expectation was never consumed.
    pub fn verify(&self) {
        let queue = self.expectations.lock().unwrap();
        assert!(
            queue.is_empty(),
            "Not all expectations were met. {} remaining",
            queue.len()
        );
    }

    fn push(&self, expectation: Expectation) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

pub struct ApplyExpectation<'a> {
    mock: &'a MockLedgerClient,
}

impl ApplyExpectation<'_> {
    pub fn return_outcome(self, outcome: OperationOutcome) {
        self.mock.push(Expectation::Apply { outcome });
    }
}

pub struct BulkExpectation<'a> {
    mock: &'a MockLedgerClient,
}

impl BulkExpectation<'_> {
    pub fn return_report(self, report: BulkReport) {
        self.mock.push(Expectation::ApplyBulk { report });
    }
}

pub struct StatusExpectation<'a> {
    mock: &'a MockLedgerClient,
    key: StockKey,
}

impl StatusExpectation<'_> {
    pub fn return_record(self, record: Option<StockRecord>) {
        let key = self.key.clone();
        self.mock.push(Expectation::Status { key, record });
    }
}

pub struct LowStockExpectation<'a> {
    mock: &'a MockLedgerClient,
}

impl LowStockExpectation<'_> {
    pub fn return_records(self, records: Vec<StockRecord>) {
        self.mock.push(Expectation::LowStock { records });
    }
}

pub struct MovementsExpectation<'a> {
    mock: &'a MockLedgerClient,
}

impl MovementsExpectation<'_> {
    pub fn return_entries(self, entries: Vec<MovementEntry>) {
        self.mock.push(Expectation::Movements { entries });
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client plus the receiver its requests arrive on, so a test can
/// assert on the exact messages and answer them by hand.
pub fn create_mock_client(buffer_size: usize) -> (LedgerClient, mpsc::Receiver<LedgerRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (LedgerClient::new(sender), receiver)
}

/// A client whose actor is already gone; every call fails with
/// `Unavailable`.
pub fn closed_client() -> LedgerClient {
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    LedgerClient::new(sender)
}

/// Receives the next request, asserting it is an `Apply`.
pub async fn expect_apply(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(StockOperation, Respond<OperationOutcome>)> {
    match receiver.recv().await {
        Some(LedgerRequest::Apply { op, respond_to }) => Some((op, respond_to)),
        _ => None,
    }
}

/// Receives the next request, asserting it is a `Status`.
pub async fn expect_status(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(StockKey, Respond<Option<StockRecord>>)> {
    match receiver.recv().await {
        Some(LedgerRequest::Status { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Receives the next request, asserting it is an `ApplyBulk`.
pub async fn expect_bulk(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(Vec<StockOperation>, Respond<BulkReport>)> {
    match receiver.recv().await {
        Some(LedgerRequest::ApplyBulk { ops, respond_to }) => Some((ops, respond_to)),
        _ => None,
    }
}
