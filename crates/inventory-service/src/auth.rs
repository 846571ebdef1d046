//! Caller identity and the gate seams in front of mutating endpoints.
//!
//! Who may change stock, and how often, is decided outside this service;
//! the [`Api`](crate::api::Api) only consumes the two traits below. The
//! reference implementations here are small and in-memory — enough for
//! tests and the demo binary, swappable for the real thing in production
//! wiring.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// The identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Stable identity used for rate accounting (user id, api key id, ...).
    pub identity: String,
    /// Credential presented with the request, if any.
    pub token: Option<String>,
}

impl Caller {
    pub fn new(identity: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            token: Some(token.into()),
        }
    }

    /// A caller with no credential; enough for read-only endpoints.
    pub fn anonymous(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            token: None,
        }
    }
}

/// Decides whether a caller may invoke a mutating endpoint.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, caller: &Caller) -> bool;
}

/// Bounds call frequency per caller identity.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn allow(&self, identity: &str) -> bool;
}

/// Authorizes callers presenting one of a fixed set of tokens.
pub struct StaticTokenAuthorizer {
    tokens: HashSet<String>,
}

impl StaticTokenAuthorizer {
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Authorizer for StaticTokenAuthorizer {
    async fn authorize(&self, caller: &Caller) -> bool {
        caller
            .token
            .as_ref()
            .is_some_and(|token| self.tokens.contains(token))
    }
}

/// Fixed-window request counter per identity.
///
/// Counts requests in the current window and denies once `max_requests` is
/// reached; the counter resets when the window elapses.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn allow(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let (start, count) = windows
            .entry(identity.to_string())
            .or_insert((now, 0));
        if now.duration_since(*start) >= self.window {
            *start = now;
            *count = 0;
        }
        if *count < self.max_requests {
            *count += 1;
            true
        } else {
            false
        }
    }
}

/// Gate that admits everything; for demos and tests.
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn authorize(&self, _caller: &Caller) -> bool {
        true
    }
}

#[async_trait]
impl RateLimiter for AllowAll {
    async fn allow(&self, _identity: &str) -> bool {
        true
    }
}
