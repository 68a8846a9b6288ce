//! Error types for shop operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::Client;

/// Errors produced while opening, running or closing a shop.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An OS thread could not be spawned.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        /// Which thread failed (e.g. `barber-2`, `shop-clock`).
        role: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A barber or the scheduler thread panicked.
    #[error("thread panicked: {0}")]
    ThreadPanicked(String),
    /// A concurrency invariant was observed broken (capacity, double service, lost client).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Internal failure outside the shop's own threads (e.g. async join).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Why an arrival was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Every chair was taken.
    NoChair,
    /// Arrivals were already closed.
    ShopClosed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChair => f.write_str("no_chair"),
            Self::ShopClosed => f.write_str("shop_closed"),
        }
    }
}

/// A refused admission. Hands the client back to the caller; it is never queued or retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("client {} rejected: {reason}", .client.id)]
pub struct AdmissionRejected {
    /// The client that was turned away.
    pub client: Client,
    /// Why it was turned away.
    pub reason: RejectReason,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
