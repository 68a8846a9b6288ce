//! Shop counters, live statistics and the closing summary.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client::ClientId;
use crate::util::SimTime;

/// Snapshot of shop activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStats {
    /// Clients that walked in.
    pub arrivals: u64,
    /// Clients admitted into the room.
    pub admitted: u64,
    /// Clients turned away.
    pub dropped: u64,
    /// Haircuts completed.
    pub served: u64,
    /// Haircuts in progress.
    pub in_service: u64,
}

/// Internal counters (lock-free atomics).
#[derive(Debug, Default)]
pub(crate) struct ShopCounters {
    pub arrivals: AtomicU64,
    pub admitted: AtomicU64,
    pub dropped: AtomicU64,
    pub served: AtomicU64,
    pub in_service: AtomicU64,
}

impl ShopCounters {
    /// Mint the next client id and count the arrival.
    pub fn next_arrival(&self) -> ClientId {
        ClientId(self.arrivals.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn snapshot(&self) -> ShopStats {
        ShopStats {
            arrivals: self.arrivals.load(Ordering::Acquire),
            admitted: self.admitted.load(Ordering::Acquire),
            dropped: self.dropped.load(Ordering::Acquire),
            served: self.served.load(Ordering::Acquire),
            in_service: self.in_service.load(Ordering::Acquire),
        }
    }
}

/// Every client that has entered service, to catch double delivery.
#[derive(Debug, Default)]
pub(crate) struct ServiceLedger {
    seen: Mutex<HashSet<ClientId>>,
    duplicates: AtomicU64,
}

impl ServiceLedger {
    /// Record that `client` entered service. Returns `false` if it already had.
    pub fn begin(&self, client: ClientId) -> bool {
        let fresh = self.seen.lock().insert(client);
        if !fresh {
            self.duplicates.fetch_add(1, Ordering::AcqRel);
        }
        fresh
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Acquire)
    }
}

/// Final report produced once every barber has gone home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSummary {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Barber count.
    pub barbers: usize,
    /// Chair count.
    pub chairs: usize,
    /// Clients that walked in.
    pub arrivals: u64,
    /// Clients admitted into the room.
    pub admitted: u64,
    /// Clients served, including those drained after closing.
    pub served: u64,
    /// Clients turned away.
    pub dropped: u64,
    /// Clients seated in the room when arrivals stopped.
    pub drained: u64,
    /// Highest seated occupancy seen.
    pub peak_occupancy: usize,
    /// Simulated time when the last barber was joined.
    pub closed_at: SimTime,
}

impl ShopSummary {
    /// `served + dropped == arrivals`.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.served + self.dropped == self.arrivals
    }
}
