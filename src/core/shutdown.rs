//! Closing the shop: stop arrivals, drain the room, join every thread, report.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use tracing::{debug, error, info, warn};

use super::error::ShopError;
use super::events::ShopEvent;
use super::scheduler::ClosingNotice;
use super::shop::ShopContext;
use super::stats::{ShopStats, ShopSummary};
use super::worker_pool::WorkerPool;

/// Owns the shop's threads and tears them down once closing time is signaled.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    ctx: Arc<ShopContext>,
    closing: Receiver<ClosingNotice>,
    scheduler: Option<JoinHandle<ClosingNotice>>,
    pool: WorkerPool,
}

impl ShutdownCoordinator {
    pub(crate) const fn new(
        ctx: Arc<ShopContext>,
        closing: Receiver<ClosingNotice>,
        scheduler: Option<JoinHandle<ClosingNotice>>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            ctx,
            closing,
            scheduler,
            pool,
        }
    }

    /// Wait for the closing signal, then close arrivals, drain, join and report.
    ///
    /// Clients already waiting at closing are still served; only new arrivals
    /// are refused.
    ///
    /// # Errors
    ///
    /// [`ShopError::ThreadPanicked`] if the scheduler or a barber panicked (all
    /// threads are joined regardless), [`ShopError::InvariantViolation`] if the
    /// final accounting is inconsistent. Either way the stream ends with
    /// `shop_failed` instead of `shop_closed`.
    pub fn wait(self) -> Result<ShopSummary, ShopError> {
        let Self {
            ctx,
            closing,
            scheduler,
            pool,
        } = self;

        match closing.recv() {
            Ok(notice) => info!(at = %notice.at, arrivals = notice.arrivals, "closing time"),
            Err(_) => warn!("arrival side went away without a closing signal; closing anyway"),
        }

        let waiting = ctx.room().close_arrivals();
        ctx.emit(ShopEvent::ArrivalsStopped { waiting });

        let mut failure = None;
        if let Some(handle) = scheduler {
            if handle.join().is_err() {
                warn!("scheduler thread panicked");
                failure = Some(ShopError::ThreadPanicked("shop-clock".into()));
            }
        }
        debug!(barbers = pool.len(), "joining barbers");
        if let Err(err) = pool.join() {
            failure.get_or_insert(err);
        }

        let stats = ctx.stats();
        let outcome = match failure {
            Some(err) => Err(err),
            None => Audit::of(&ctx, stats).verify(),
        };
        if let Err(err) = outcome {
            error!(run_id = %ctx.run_id(), error = %err, "shop closed abnormally");
            ctx.emit(ShopEvent::ShopFailed {
                served: stats.served,
                dropped: stats.dropped,
                error: err.to_string(),
            });
            return Err(err);
        }

        ctx.emit(ShopEvent::ShopClosed {
            served: stats.served,
            dropped: stats.dropped,
        });

        let config = ctx.config();
        let summary = ShopSummary {
            run_id: ctx.run_id(),
            barbers: config.barbers,
            chairs: config.chairs,
            arrivals: stats.arrivals,
            admitted: stats.admitted,
            served: stats.served,
            dropped: stats.dropped,
            drained: waiting as u64,
            peak_occupancy: ctx.room().peak_occupancy(),
            closed_at: ctx.clock().now(),
        };
        info!(
            run_id = %summary.run_id,
            served = summary.served,
            dropped = summary.dropped,
            drained = summary.drained,
            "shop closed"
        );
        Ok(summary)
    }
}

/// Everything checked once the last barber has been joined.
#[derive(Debug, Clone, Copy)]
struct Audit {
    stats: ShopStats,
    peak: usize,
    capacity: usize,
    duplicates: u64,
    all_terminated: bool,
}

impl Audit {
    fn of(ctx: &ShopContext, stats: ShopStats) -> Self {
        Self {
            stats,
            peak: ctx.room().peak_occupancy(),
            capacity: ctx.room().capacity(),
            duplicates: ctx.ledger.duplicates(),
            all_terminated: ctx.roster().all_terminated(),
        }
    }

    fn verify(&self) -> Result<(), ShopError> {
        let stats = &self.stats;
        if stats.served + stats.dropped != stats.arrivals || stats.admitted != stats.served {
            return Err(ShopError::InvariantViolation(format!(
                "lost client: arrivals={} admitted={} served={} dropped={}",
                stats.arrivals, stats.admitted, stats.served, stats.dropped
            )));
        }
        if self.peak > self.capacity {
            return Err(ShopError::InvariantViolation(format!(
                "capacity exceeded: peak occupancy {} with {} chairs",
                self.peak, self.capacity
            )));
        }
        if self.duplicates > 0 {
            return Err(ShopError::InvariantViolation(format!(
                "{} client(s) served twice",
                self.duplicates
            )));
        }
        if !self.all_terminated {
            return Err(ShopError::InvariantViolation(
                "barber joined without terminating".into(),
            ));
        }
        Ok(())
    }
}
