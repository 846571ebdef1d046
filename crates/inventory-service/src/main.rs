//! Demo binary: walks one item through the full reservation lifecycle.
//!
//! Run with `RUST_LOG=info cargo run -p inventory-service` to watch the
//! ledger log each transition, or `RUST_LOG=debug` for every request.

use inventory_service::auth::{AllowAll, Caller};
use inventory_service::config::LedgerConfig;
use inventory_service::setup_tracing;
use inventory_service::system::LedgerSystem;
use inventory_service::{BulkRequest, OperationRequest};
use inventory_ledger::StockAction;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

fn op(action: StockAction, product: &str, quantity: u32, reference: Option<&str>) -> OperationRequest {
    OperationRequest {
        action,
        product_id: product.to_string(),
        variant_id: None,
        quantity,
        reason: None,
        reference: reference.map(String::from),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Starting inventory ledger service");
    let system = LedgerSystem::new(LedgerConfig::from_env());
    let api = system.api(Arc::new(AllowAll), Arc::new(AllowAll));
    let caller = Caller::anonymous("demo");

    let span = tracing::info_span!("checkout_walkthrough", product = "sku-1");
    async {
        let response = api
            .operation(&caller, op(StockAction::Add, "sku-1", 10, None))
            .await?;
        info!(message = %response.message, "Stock added");

        let response = api
            .operation(&caller, op(StockAction::Reserve, "sku-1", 4, Some("order-99")))
            .await?;
        info!(message = %response.message, "Order hold placed");

        let response = api
            .operation(
                &caller,
                op(StockAction::ConfirmSale, "sku-1", 4, Some("order-99")),
            )
            .await?;
        info!(message = %response.message, "Sale confirmed");

        // An oversized reservation is refused without touching state.
        let response = api
            .operation(&caller, op(StockAction::Reserve, "sku-1", 100, None))
            .await?;
        warn!(
            status = response.http_status(),
            message = %response.message,
            "Oversized reservation rejected"
        );

        Ok::<(), Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    // Bulk restock: one bad line does not block the others.
    let report = api
        .bulk(
            &caller,
            BulkRequest {
                updates: vec![
                    op(StockAction::Add, "sku-2", 25, None),
                    op(StockAction::Add, "sku-3", 0, None),
                    op(StockAction::Add, "sku-4", 3, None),
                ],
            },
        )
        .await?;
    info!(
        processed = report.processed,
        failed = report.errors.len(),
        "Bulk restock finished"
    );

    let record = api.status("sku-1", None).await?;
    info!(
        available = record.available,
        reserved = record.reserved,
        sold = record.sold,
        "Final state of sku-1"
    );

    for record in api.low_stock().await? {
        warn!(
            product_id = %record.product_id,
            available = record.available,
            threshold = record.low_stock_threshold,
            "Low stock"
        );
    }

    for entry in api.movements(Some("sku-1"), None, None).await? {
        info!(
            id = entry.id,
            kind = %entry.kind,
            quantity = entry.quantity,
            reference = entry.reference.as_deref().unwrap_or("-"),
            "Movement"
        );
    }

    // The api holds its own client clone; release it so the actor can exit.
    drop(api);
    system.shutdown().await?;
    info!("Done");
    Ok(())
}
