//! # Inventory Service
//!
//! Actor-based runtime for the stock reservation and fulfillment ledger.
//! The domain rules live in the `inventory-ledger` crate; this crate makes
//! them safe to use concurrently and puts a request surface in front of
//! them.
//!
//! ## Concurrency model
//!
//! All stock state is owned by a single [`LedgerActor`](actor::LedgerActor)
//! task. Requests arrive over an mpsc channel and are processed one at a
//! time, so every precondition check and its matching mutation form one
//! uninterrupted step — the serialization that prevents two racing reserves
//! from overselling one key. Operations against different keys share the
//! queue but need no further coordination.
//!
//! ## Layers
//!
//! - [`actor`] / [`message`] — the server side: owns the `StockBook`,
//!   answers [`LedgerRequest`](message::LedgerRequest)s.
//! - [`client`] — [`LedgerClient`](client::LedgerClient), the cloneable
//!   async handle.
//! - [`api`] — the external surface: DTOs, status mapping, gated mutations.
//! - [`auth`] — caller identity plus the `Authorizer` / `RateLimiter`
//!   seams.
//! - [`system`] — [`LedgerSystem`](system::LedgerSystem) lifecycle
//!   orchestration.
//! - [`mock`] — test doubles for the client, no actor required.
//!
//! ## Quick start
//!
//! ```rust
//! use inventory_service::config::LedgerConfig;
//! use inventory_service::system::LedgerSystem;
//! use inventory_ledger::StockKey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = LedgerSystem::new(LedgerConfig::default());
//!
//!     let outcome = system
//!         .client
//!         .add_stock(StockKey::product("sku-1"), 10, None)
//!         .await?;
//!     assert!(outcome.success);
//!
//!     let record = system.client.status(StockKey::product("sku-1")).await?;
//!     assert_eq!(record.available, 10);
//!
//!     system.shutdown().await.map_err(Into::into)
//! }
//! ```

pub mod actor;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod mock;
pub mod system;
pub mod tracing;

pub use actor::LedgerActor;
pub use api::{Api, ApiError, BulkRequest, BulkResponse, OperationRequest, OperationResponse};
pub use auth::{AllowAll, Authorizer, Caller, FixedWindowLimiter, RateLimiter, StaticTokenAuthorizer};
pub use client::LedgerClient;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use message::{LedgerRequest, Respond};
pub use system::LedgerSystem;
pub use crate::tracing::setup_tracing;
