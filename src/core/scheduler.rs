//! Arrival side of the shop: the arrival plan, the arrival desk and the clock-driven scheduler.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use super::client::{Client, ClientId};
use super::error::{RejectReason, ShopError};
use super::events::ShopEvent;
use super::shop::ShopContext;
use crate::config::ShopConfig;
use crate::util::SimTime;

/// Arrival times from opening up to (not including) closing, one per interval.
#[derive(Debug, Clone)]
pub struct ArrivalPlan {
    next: SimTime,
    closing: SimTime,
    interval: Duration,
}

impl ArrivalPlan {
    /// Plan arrivals at `opening`, `opening + interval`, ... while before `closing`.
    #[must_use]
    pub const fn new(opening: SimTime, closing: SimTime, interval: Duration) -> Self {
        Self {
            next: opening,
            closing,
            interval,
        }
    }

    /// Plan for a shop configuration.
    #[must_use]
    pub const fn from_config(config: &ShopConfig) -> Self {
        Self::new(config.opening_time(), config.closing_time(), config.client_interval())
    }

    /// Closing time of the plan.
    #[must_use]
    pub const fn closing(&self) -> SimTime {
        self.closing
    }
}

impl Iterator for ArrivalPlan {
    type Item = SimTime;

    fn next(&mut self) -> Option<SimTime> {
        if self.next >= self.closing {
            return None;
        }
        let at = self.next;
        self.next = if self.interval.is_zero() {
            self.closing
        } else {
            at + self.interval
        };
        Some(at)
    }
}

/// Outcome of one arrival attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Arrival {
    /// The client got a chair (or went straight to a sleeping barber).
    Admitted {
        /// Client.
        client: ClientId,
    },
    /// The client was turned away.
    Dropped {
        /// Client.
        client: ClientId,
        /// Why.
        reason: RejectReason,
    },
}

impl Arrival {
    /// The client this arrival minted.
    #[must_use]
    pub const fn client(&self) -> ClientId {
        match self {
            Self::Admitted { client } | Self::Dropped { client, .. } => *client,
        }
    }

    /// Whether the client was admitted.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// "No further arrivals" notice, sent once at closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingNotice {
    /// Simulated time the notice was fired.
    pub at: SimTime,
    /// Arrivals attempted before closing.
    pub arrivals: u64,
}

/// One-shot sender of the [`ClosingNotice`].
///
/// Firing consumes the signal, so it can be sent at most once, and uses a
/// one-slot channel with `try_send`, so firing never blocks.
#[derive(Debug)]
pub struct ClosingSignal {
    tx: Sender<ClosingNotice>,
}

impl ClosingSignal {
    pub(crate) fn channel() -> (Self, Receiver<ClosingNotice>) {
        let (tx, rx) = bounded(1);
        (Self { tx }, rx)
    }

    /// Send the notice.
    pub fn fire(self, notice: ClosingNotice) {
        // Receiver gone means nobody waits for closing any more.
        let _ = self.tx.try_send(notice);
    }
}

/// The arrival path: mints clients and runs them through the admission gate.
///
/// Driven by the [`Scheduler`] in a normal run, or by hand after
/// [`ShopBuilder::open_manual`](crate::builders::ShopBuilder::open_manual).
#[derive(Debug)]
pub struct ArrivalDesk {
    ctx: Arc<ShopContext>,
    signal: ClosingSignal,
}

impl ArrivalDesk {
    pub(crate) const fn new(ctx: Arc<ShopContext>, signal: ClosingSignal) -> Self {
        Self { ctx, signal }
    }

    /// Shared context of the shop this desk feeds.
    #[must_use]
    pub const fn context(&self) -> &Arc<ShopContext> {
        &self.ctx
    }

    /// A client arrives now.
    pub fn arrive(&self) -> Arrival {
        self.arrive_at(self.ctx.clock().now())
    }

    /// A client arrives at `at`. Never blocks; a full room drops the client.
    pub fn arrive_at(&self, at: SimTime) -> Arrival {
        let id = self.ctx.counters.next_arrival();
        self.ctx.emit_at(at, ShopEvent::ClientArrived { client: id });

        match self.ctx.room().try_enqueue(Client::new(id, at)) {
            Ok(occupancy) => {
                self.ctx.counters.admitted.fetch_add(1, Ordering::AcqRel);
                debug!(client = %id, occupancy, "client admitted");
                Arrival::Admitted { client: id }
            }
            Err(rejected) => {
                self.ctx.counters.dropped.fetch_add(1, Ordering::AcqRel);
                self.ctx.emit_at(
                    at,
                    ShopEvent::ClientDropped {
                        client: id,
                        reason: rejected.reason,
                    },
                );
                Arrival::Dropped {
                    client: id,
                    reason: rejected.reason,
                }
            }
        }
    }

    /// Fire the closing signal now. Consumes the desk: no arrival can follow.
    pub fn close(self) -> ClosingNotice {
        let at = self.ctx.clock().now();
        self.close_at(at)
    }

    /// Fire the closing signal stamped `at`.
    pub fn close_at(self, at: SimTime) -> ClosingNotice {
        let notice = ClosingNotice {
            at,
            arrivals: self.ctx.counters.arrivals.load(Ordering::Acquire),
        };
        info!(at = %at, arrivals = notice.arrivals, "no further arrivals");
        self.signal.fire(notice);
        notice
    }
}

/// Drives an [`ArrivalDesk`] from the simulated clock.
#[derive(Debug)]
pub struct Scheduler {
    desk: ArrivalDesk,
    plan: ArrivalPlan,
}

impl Scheduler {
    /// Scheduler following `plan`.
    #[must_use]
    pub const fn new(desk: ArrivalDesk, plan: ArrivalPlan) -> Self {
        Self { desk, plan }
    }

    /// Run arrivals until closing time, then fire the closing signal.
    ///
    /// Blocks the calling thread for the whole operating window.
    pub fn run(self) -> ClosingNotice {
        let Self { desk, plan } = self;
        let clock = *desk.context().clock();
        let closing = plan.closing();

        for at in plan {
            clock.sleep_until(at);
            if desk.context().room().is_closed() {
                break;
            }
            desk.arrive_at(at);
        }

        clock.sleep_until(closing);
        desk.close_at(closing)
    }

    /// Run on a dedicated `shop-clock` thread.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Spawn`] if the thread cannot be created.
    pub fn spawn(self) -> Result<JoinHandle<ClosingNotice>, ShopError> {
        let run_id = self.desk.context().run_id();
        thread::Builder::new()
            .name("shop-clock".into())
            .spawn(move || {
                let _span = info_span!("scheduler", run_id = %run_id).entered();
                self.run()
            })
            .map_err(|source| ShopError::Spawn {
                role: "shop-clock".into(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::InMemoryEventLog;

    #[test]
    fn test_default_plan() {
        let plan: Vec<SimTime> = ArrivalPlan::from_config(&ShopConfig::default()).collect();
        let expected: Vec<SimTime> = [8, 10, 12, 14, 16, 18].into_iter().map(SimTime::from_hours).collect();
        assert_eq!(plan, expected);
    }

    #[test]
    fn test_plan_never_reaches_closing() {
        let plan = ArrivalPlan::new(
            SimTime::from_hours(8),
            SimTime::from_secs(9 * 3600 + 1),
            Duration::from_secs(1800),
        );
        let last = plan.last().unwrap();
        assert_eq!(last, SimTime::from_hours(9));
    }

    #[test]
    fn test_zero_interval_yields_single_arrival() {
        let plan = ArrivalPlan::new(SimTime::from_hours(8), SimTime::from_hours(9), Duration::ZERO);
        assert_eq!(plan.count(), 1);
    }

    #[test]
    fn test_closing_signal_fires_once_without_blocking() {
        let (signal, rx) = ClosingSignal::channel();
        let notice = ClosingNotice {
            at: SimTime::from_hours(20),
            arrivals: 6,
        };
        signal.fire(notice);
        assert_eq!(rx.try_recv().unwrap(), notice);
        // Sender consumed: the channel is now disconnected.
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_scheduler_runs_plan_then_signals() {
        let log = Arc::new(InMemoryEventLog::new(64));
        let config = ShopConfig::new()
            .with_chairs(10)
            .with_time_compression(3_600_000);
        let ctx = Arc::new(ShopContext::new(config.clone(), Box::new(Arc::clone(&log))));
        let (signal, rx) = ClosingSignal::channel();

        let handle = Scheduler::new(ArrivalDesk::new(Arc::clone(&ctx), signal), ArrivalPlan::from_config(&config))
            .spawn()
            .unwrap();
        let notice = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(notice.at, SimTime::from_hours(20));
        assert_eq!(notice.arrivals, 6);
        assert_eq!(handle.join().unwrap(), notice);
        assert_eq!(ctx.room().queued(), 6);

        let arrived: Vec<SimTime> = log
            .events()
            .iter()
            .filter(|r| matches!(r.event, ShopEvent::ClientArrived { .. }))
            .map(|r| r.at)
            .collect();
        assert_eq!(arrived.len(), 6);
        assert!(arrived.iter().all(|at| *at < SimTime::from_hours(20)));
    }
}
