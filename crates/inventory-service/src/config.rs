//! Service configuration.
//!
//! Explicit and injected: the values live in a struct handed to whoever
//! needs them, never in module-level globals.

use std::env;

/// Tunables for the ledger service.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Capacity of the actor's request channel; senders wait when full.
    pub channel_capacity: usize,
    /// Alert threshold applied to records created by their first `add`.
    pub default_low_stock_threshold: u32,
    /// Movement-history page size when the caller names none.
    pub default_movement_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            default_low_stock_threshold: 5,
            default_movement_limit: 50,
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by `LEDGER_CHANNEL_CAPACITY`,
    /// `LEDGER_LOW_STOCK_THRESHOLD` and `LEDGER_MOVEMENT_LIMIT` where set
    /// and parseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            channel_capacity: env_parsed("LEDGER_CHANNEL_CAPACITY")
                .unwrap_or(defaults.channel_capacity),
            default_low_stock_threshold: env_parsed("LEDGER_LOW_STOCK_THRESHOLD")
                .unwrap_or(defaults.default_low_stock_threshold),
            default_movement_limit: env_parsed("LEDGER_MOVEMENT_LIMIT")
                .unwrap_or(defaults.default_movement_limit),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
