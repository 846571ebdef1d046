//! System lifecycle.
//!
//! [`LedgerSystem`] is the conductor: it creates the actor and client,
//! spawns the actor's event loop, and coordinates graceful shutdown. The
//! shutdown contract follows from the channel: dropping every client closes
//! the sender side, the actor's `recv()` returns `None`, the loop drains
//! what is queued and exits, and awaiting the join handle observes that.

use crate::actor::LedgerActor;
use crate::api::Api;
use crate::auth::{Authorizer, RateLimiter};
use crate::client::LedgerClient;
use crate::config::LedgerConfig;
use std::sync::Arc;
use tracing::{error, info};

/// A running ledger: one actor task plus the client handle to it.
pub struct LedgerSystem {
    /// Client for the ledger actor; clone freely.
    pub client: LedgerClient,
    config: LedgerConfig,
    handle: tokio::task::JoinHandle<()>,
}

impl LedgerSystem {
    /// Starts the actor and returns the handle pair.
    pub fn new(config: LedgerConfig) -> Self {
        let (actor, client) = LedgerActor::new(&config);
        let handle = tokio::spawn(actor.run());
        Self {
            client,
            config,
            handle,
        }
    }

    /// Builds the external request surface over this system's client.
    pub fn api(&self, authorizer: Arc<dyn Authorizer>, limiter: Arc<dyn RateLimiter>) -> Api {
        Api::new(self.client.clone(), authorizer, limiter, &self.config)
    }

    /// Gracefully shuts down: drops the held client and waits for the actor
    /// to drain its queue and exit.
    ///
    /// Clients cloned out of this system keep the actor alive until they are
    /// dropped too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down ledger system");
        drop(self.client);
        if let Err(e) = self.handle.await {
            error!(error = ?e, "Ledger actor task failed");
            return Err(format!("ledger actor task failed: {e:?}"));
        }
        info!("Ledger system shutdown complete");
        Ok(())
    }
}
