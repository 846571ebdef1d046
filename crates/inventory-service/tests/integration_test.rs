use inventory_ledger::{MovementKind, StockAction, StockKey, StockOperation};
use inventory_service::auth::{AllowAll, Caller, StaticTokenAuthorizer};
use inventory_service::config::LedgerConfig;
use inventory_service::system::LedgerSystem;
use inventory_service::{ApiError, BulkRequest, OperationRequest};
use std::sync::Arc;

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

/// Full end-to-end pass through the real actor: add, reserve, confirm, and a
/// rejected oversell, checking the record and the audit trail after each
/// step.
#[tokio::test]
async fn test_full_reservation_lifecycle() {
    let system = LedgerSystem::new(LedgerConfig::default());
    let client = &system.client;
    let key = StockKey::product("sku-1");

    let outcome = client
        .add_stock(key.clone(), 10, Some("initial import".to_string()))
        .await
        .expect("add failed");
    assert!(outcome.success);
    let record = client.status(key.clone()).await.expect("status failed");
    assert_eq!(record.available, 10);

    let outcome = client
        .reserve_stock(key.clone(), 4, Some("order-99".to_string()))
        .await
        .expect("reserve failed");
    assert!(outcome.success);
    let record = client.status(key.clone()).await.unwrap();
    assert_eq!((record.available, record.reserved), (6, 4));

    let outcome = client
        .confirm_sale(key.clone(), 4, Some("order-99".to_string()))
        .await
        .expect("confirm failed");
    assert!(outcome.success);
    let record = client.status(key.clone()).await.unwrap();
    assert_eq!((record.available, record.reserved, record.sold), (6, 0, 4));

    // Oversized reservation: rejected, state untouched, nothing logged.
    let outcome = client.reserve_stock(key.clone(), 100, None).await.unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.contains("insufficient"));
    let record = client.status(key.clone()).await.unwrap();
    assert_eq!((record.available, record.reserved, record.sold), (6, 0, 4));

    // Exactly one movement per applied operation, most recent first.
    let movements = client
        .movements(Some("sku-1".to_string()), None, 50)
        .await
        .unwrap();
    let kinds: Vec<MovementKind> = movements.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![MovementKind::ConfirmSale, MovementKind::Reserve, MovementKind::Add]
    );
    assert_eq!(movements[0].reference.as_deref(), Some("order-99"));

    system.shutdown().await.expect("shutdown failed");
}

/// Concurrent reserves against one key: the actor serializes them, so
/// exactly `stock / per_order` succeed and the rest are rejected.
#[tokio::test]
async fn test_concurrent_reserves_never_oversell() {
    let system = LedgerSystem::new(LedgerConfig::default());
    let key = StockKey::product("limited");

    system.client.add_stock(key.clone(), 20, None).await.unwrap();

    let mut handles = vec![];
    for i in 0..30 {
        let client = system.client.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            client
                .reserve_stock(key, 2, Some(format!("order-{i}")))
                .await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        if outcome.success {
            accepted += 1;
        } else {
            rejected += 1;
        }
    }

    // 20 units, 2 per order: exactly 10 holds fit.
    assert_eq!(accepted, 10, "Expected exactly 10 successful reservations");
    assert_eq!(rejected, 20, "Remaining reservations must be rejected");

    let record = system.client.status(key.clone()).await.unwrap();
    assert_eq!(record.available, 0);
    assert_eq!(record.reserved, 20);

    // Ledger completeness: one add plus one entry per accepted reserve.
    let movements = system.client
        .movements(Some("limited".to_string()), None, 100)
        .await
        .unwrap();
    assert_eq!(movements.len(), 11);

    system.shutdown().await.unwrap();
}

/// Bulk updates apply item by item: one invalid line is reported and the
/// rest of the batch still lands.
#[tokio::test]
async fn test_bulk_partial_success() {
    let system = LedgerSystem::new(LedgerConfig::default());
    let client = &system.client;

    let report = client
        .bulk_update(vec![
            StockOperation::new(StockAction::Add, "sku-1", 10),
            StockOperation::new(StockAction::Add, "sku-2", 0),
            StockOperation::new(StockAction::Add, "sku-3", 7),
        ])
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, 1);
    assert!(!report.fully_processed());

    assert_eq!(
        client.status(StockKey::product("sku-1")).await.unwrap().available,
        10
    );
    assert!(client.status(StockKey::product("sku-2")).await.is_err());
    assert_eq!(
        client.status(StockKey::product("sku-3")).await.unwrap().available,
        7
    );

    system.shutdown().await.unwrap();
}

/// Low-stock polling through the full stack, most urgent first.
#[tokio::test]
async fn test_low_stock_snapshot() {
    let config = LedgerConfig {
        default_low_stock_threshold: 5,
        ..LedgerConfig::default()
    };
    let system = LedgerSystem::new(config);
    let client = &system.client;

    client
        .add_stock(StockKey::product("plenty"), 100, None)
        .await
        .unwrap();
    client
        .add_stock(StockKey::product("scarce"), 4, None)
        .await
        .unwrap();
    client
        .add_stock(StockKey::product("critical"), 1, None)
        .await
        .unwrap();

    let hits = client.low_stock().await.unwrap();
    let products: Vec<&str> = hits.iter().map(|r| r.product_id.as_str()).collect();
    assert_eq!(products, vec!["critical", "scarce"]);

    system.shutdown().await.unwrap();
}

/// The API surface end to end: gated mutations, open reads, status mapping.
#[tokio::test]
async fn test_api_over_real_actor() {
    let system = LedgerSystem::new(LedgerConfig::default());
    let api = system.api(
        Arc::new(StaticTokenAuthorizer::new(["admin-token"])),
        Arc::new(AllowAll),
    );

    let admin = Caller::new("admin", "admin-token");
    let stranger = Caller::anonymous("stranger");

    // Unauthorized mutation is refused before reaching the ledger.
    let error = api
        .operation(&stranger, request(StockAction::Add, "sku-1", 10))
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Unauthorized));
    assert!(matches!(
        api.status("sku-1", None).await.unwrap_err(),
        ApiError::NotFound(_)
    ));

    // Authorized mutation lands.
    let response = api
        .operation(&admin, request(StockAction::Add, "sku-1", 10))
        .await
        .unwrap();
    assert!(response.success);

    // Reads are open to anyone.
    let record = api.status("sku-1", None).await.unwrap();
    assert_eq!(record.available, 10);

    let response = api
        .bulk(
            &admin,
            BulkRequest {
                updates: vec![
                    request(StockAction::Reserve, "sku-1", 3),
                    request(StockAction::Reserve, "sku-1", 100),
                ],
            },
        )
        .await
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.processed, 1);
    assert_eq!(response.errors[0].index, 1);

    let movements = api.movements(Some("sku-1"), None, None).await.unwrap();
    assert_eq!(movements.len(), 2);

    // The api holds its own client clone; release it so the actor can exit.
    drop(api);
    system.shutdown().await.unwrap();
}

/// Variant-level records are independent of their parent product.
#[tokio::test]
async fn test_variants_are_independent_keys() {
    let system = LedgerSystem::new(LedgerConfig::default());
    let client = &system.client;

    let product = StockKey::product("shampoo");
    let variant = StockKey::new("shampoo", Some("500ml".to_string()));

    client.add_stock(product.clone(), 10, None).await.unwrap();
    client.add_stock(variant.clone(), 3, None).await.unwrap();
    client.reserve_stock(variant.clone(), 2, None).await.unwrap();

    assert_eq!(client.status(product).await.unwrap().available, 10);
    let variant_record = client.status(variant).await.unwrap();
    assert_eq!((variant_record.available, variant_record.reserved), (1, 2));

    system.shutdown().await.unwrap();
}
