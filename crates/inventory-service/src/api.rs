//! External request surface.
//!
//! [`Api`] is the narrow boundary callers (order workflow, admin tooling,
//! bulk import jobs) talk to. The wire format is whoever hosts this —
//! handlers deserialize into the DTOs here and serialize the results back;
//! the contract is the shapes and the HTTP-equivalent status mapping, not a
//! concrete framework.
//!
//! Read endpoints are open. Mutating endpoints (`operation`, `bulk`) pass
//! two injected gates first: the [`RateLimiter`], then the [`Authorizer`].
//!
//! A precondition failure is not an `Err`: `operation` returns
//! `Ok(OperationResponse { success: false, .. })` and maps to 400. `Err`
//! is reserved for the gates (401/429), missing records (404) and an
//! unreachable ledger (503, the one class worth retrying).

use crate::auth::{Authorizer, Caller, RateLimiter};
use crate::client::LedgerClient;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use inventory_ledger::{BulkError, MovementEntry, StockAction, StockOperation, StockRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{instrument, warn};

/// One requested stock operation, as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub action: StockAction,
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl From<OperationRequest> for StockOperation {
    fn from(request: OperationRequest) -> Self {
        Self {
            product_id: request.product_id,
            variant_id: request.variant_id,
            action: request.action,
            quantity: request.quantity,
            reason: request.reason,
            reference: request.reference,
        }
    }
}

/// Outcome of a single operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResponse {
    pub success: bool,
    pub message: String,
}

impl OperationResponse {
    /// HTTP-equivalent status: 200 for applied, 400 for rejected.
    pub fn http_status(&self) -> u16 {
        if self.success {
            200
        } else {
            400
        }
    }
}

/// An ordered batch of operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    pub updates: Vec<OperationRequest>,
}

/// Per-item results of a batch; `success` means every item applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    pub success: bool,
    pub processed: usize,
    pub errors: Vec<BulkError>,
}

/// Failures surfaced as error statuses rather than rejected outcomes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller may not invoke mutating endpoints (401).
    #[error("caller is not authorized to modify stock")]
    Unauthorized,

    /// Caller exceeded its request budget (429).
    #[error("rate limit exceeded for caller '{0}'")]
    RateLimited(String),

    /// No stock record for the requested key (404).
    #[error("no stock record for {0}")]
    NotFound(String),

    /// The ledger could not be reached (503); retryable.
    #[error("ledger unavailable: {0}")]
    Unavailable(#[source] LedgerError),
}

impl ApiError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::RateLimited(_) => 429,
            Self::NotFound(_) => 404,
            Self::Unavailable(_) => 503,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::NotFound(key) => Self::NotFound(key),
            other => Self::Unavailable(other),
        }
    }
}

/// The request surface over the ledger.
pub struct Api {
    client: LedgerClient,
    authorizer: Arc<dyn Authorizer>,
    limiter: Arc<dyn RateLimiter>,
    default_movement_limit: usize,
}

impl Api {
    pub fn new(
        client: LedgerClient,
        authorizer: Arc<dyn Authorizer>,
        limiter: Arc<dyn RateLimiter>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            client,
            authorizer,
            limiter,
            default_movement_limit: config.default_movement_limit,
        }
    }

    /// `GET status` — current record for a key, or 404.
    #[instrument(skip(self))]
    pub async fn status(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<StockRecord, ApiError> {
        let key = inventory_ledger::StockKey::new(product_id, variant_id.map(String::from));
        Ok(self.client.status(key).await?)
    }

    /// `GET lowStock` — records at or below their alert threshold, most
    /// urgent first.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<StockRecord>, ApiError> {
        Ok(self.client.low_stock().await?)
    }

    /// `GET movements` — most-recent-first history, optionally filtered;
    /// `limit` defaults from configuration (50).
    #[instrument(skip(self))]
    pub async fn movements(
        &self,
        product_id: Option<&str>,
        variant_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<MovementEntry>, ApiError> {
        let limit = limit.unwrap_or(self.default_movement_limit);
        Ok(self
            .client
            .movements(
                product_id.map(String::from),
                variant_id.map(String::from),
                limit,
            )
            .await?)
    }

    /// `POST operation` — apply one transition. Precondition failures come
    /// back as `success: false` (HTTP-equivalent 400), not as `Err`.
    #[instrument(skip(self, request), fields(caller = %caller.identity, action = %request.action))]
    pub async fn operation(
        &self,
        caller: &Caller,
        request: OperationRequest,
    ) -> Result<OperationResponse, ApiError> {
        self.gate(caller).await?;
        let outcome = self.client.apply(request.into()).await?;
        Ok(OperationResponse {
            success: outcome.success,
            message: outcome.message,
        })
    }

    /// `PUT bulk` — apply an ordered batch item by item; per-item failures
    /// are collected, never rolled back.
    #[instrument(skip(self, request), fields(caller = %caller.identity, items = request.updates.len()))]
    pub async fn bulk(
        &self,
        caller: &Caller,
        request: BulkRequest,
    ) -> Result<BulkResponse, ApiError> {
        self.gate(caller).await?;
        let ops: Vec<StockOperation> = request.updates.into_iter().map(Into::into).collect();
        let report = self.client.bulk_update(ops).await?;
        Ok(BulkResponse {
            success: report.fully_processed(),
            processed: report.processed,
            errors: report.errors,
        })
    }

    async fn gate(&self, caller: &Caller) -> Result<(), ApiError> {
        if !self.limiter.allow(&caller.identity).await {
            warn!(caller = %caller.identity, "rate limited");
            return Err(ApiError::RateLimited(caller.identity.clone()));
        }
        if !self.authorizer.authorize(caller).await {
            warn!(caller = %caller.identity, "unauthorized");
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AllowAll, FixedWindowLimiter, StaticTokenAuthorizer};
    use crate::mock::MockLedgerClient;
    use inventory_ledger::{BulkReport, OperationOutcome, StockKey, StockRecord};
    use chrono::Utc;
    use std::time::Duration;

    fn request(action: StockAction, product: &str, quantity: u32) -> OperationRequest {
        OperationRequest {
            action,
            product_id: product.to_string(),
            variant_id: None,
            quantity,
            reason: None,
            reference: None,
        }
    }

    fn open_api(client: LedgerClient) -> Api {
        Api::new(
            client,
            Arc::new(AllowAll),
            Arc::new(AllowAll),
            &LedgerConfig::default(),
        )
    }

    #[tokio::test]
    async fn operation_maps_outcome_to_response() {
        let mut mock = MockLedgerClient::new();
        mock.expect_apply()
            .return_outcome(OperationOutcome::accepted("added 10 unit(s) to sku-1"));
        let api = open_api(mock.client());

        let response = api
            .operation(
                &Caller::new("ops", "secret"),
                request(StockAction::Add, "sku-1", 10),
            )
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.http_status(), 200);
        mock.verify();
    }

    #[tokio::test]
    async fn rejected_operation_is_ok_with_status_400() {
        let mut mock = MockLedgerClient::new();
        mock.expect_apply().return_outcome(OperationOutcome::rejected(
            "insufficient stock: requested 100, available 6",
        ));
        let api = open_api(mock.client());

        let response = api
            .operation(
                &Caller::new("ops", "secret"),
                request(StockAction::Reserve, "sku-1", 100),
            )
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.http_status(), 400);
    }

    #[tokio::test]
    async fn mutations_require_authorization_but_reads_do_not() {
        let mut mock = MockLedgerClient::new();
        mock.expect_low_stock().return_records(vec![]);
        let api = Api::new(
            mock.client(),
            Arc::new(StaticTokenAuthorizer::new(["secret"])),
            Arc::new(AllowAll),
            &LedgerConfig::default(),
        );

        let result = api
            .operation(
                &Caller::anonymous("stranger"),
                request(StockAction::Add, "sku-1", 1),
            )
            .await;
        let error = result.unwrap_err();
        assert_eq!(error.http_status(), 401);

        // Reads pass without a credential.
        assert!(api.low_stock().await.unwrap().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn rate_limit_applies_before_authorization() {
        let mock = MockLedgerClient::new();
        let api = Api::new(
            mock.client(),
            Arc::new(StaticTokenAuthorizer::new(["secret"])),
            Arc::new(FixedWindowLimiter::new(0, Duration::from_secs(60))),
            &LedgerConfig::default(),
        );

        let error = api
            .operation(
                &Caller::new("ops", "secret"),
                request(StockAction::Add, "sku-1", 1),
            )
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 429);
    }

    #[tokio::test]
    async fn status_of_unknown_key_maps_to_404() {
        let mut mock = MockLedgerClient::new();
        mock.expect_status(StockKey::product("ghost")).return_record(None);
        let api = open_api(mock.client());

        let error = api.status("ghost", None).await.unwrap_err();
        assert_eq!(error.http_status(), 404);
    }

    #[tokio::test]
    async fn bulk_reports_partial_success() {
        let mut mock = MockLedgerClient::new();
        mock.expect_bulk().return_report(BulkReport {
            processed: 2,
            errors: vec![BulkError {
                index: 1,
                product_id: "sku-2".to_string(),
                message: "invalid quantity: 0 (must be greater than zero)".to_string(),
            }],
        });
        let api = open_api(mock.client());

        let response = api
            .bulk(
                &Caller::new("ops", "secret"),
                BulkRequest {
                    updates: vec![
                        request(StockAction::Add, "sku-1", 10),
                        request(StockAction::Add, "sku-2", 0),
                        request(StockAction::Add, "sku-3", 7),
                    ],
                },
            )
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.processed, 2);
        assert_eq!(response.errors[0].index, 1);
    }

    #[tokio::test]
    async fn movements_use_configured_default_limit() {
        let mut mock = MockLedgerClient::new();
        let entry = MovementEntry {
            id: 1,
            product_id: "sku-1".to_string(),
            variant_id: None,
            kind: inventory_ledger::MovementKind::Add,
            quantity: 10,
            reason: "stock added".to_string(),
            reference: None,
            created_at: Utc::now(),
        };
        mock.expect_movements().return_entries(vec![entry]);
        let api = open_api(mock.client());

        let entries = api.movements(Some("sku-1"), None, None).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn unavailable_ledger_maps_to_503() {
        let error = ApiError::from(LedgerError::Unavailable);
        assert_eq!(error.http_status(), 503);
    }

    #[test]
    fn record_serializes_with_quantity_buckets() {
        // DTO shape check: the record exposes all three buckets.
        let record = StockRecord::new(&StockKey::product("sku-1"), 5, Utc::now());
        assert_eq!(record.available + record.reserved + record.sold, 0);
    }
}
