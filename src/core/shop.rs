//! The shop context shared by the scheduler, the room and the barbers, and the
//! handle to a running shop.

use std::sync::Arc;

use uuid::Uuid;

use super::error::ShopError;
use super::events::{EventBus, EventSink, ShopEvent};
use super::shutdown::ShutdownCoordinator;
use super::stats::{ServiceLedger, ShopCounters, ShopStats, ShopSummary};
use super::waiting_room::WaitingRoom;
use super::worker_pool::{BarberRoster, BarberState};
use crate::config::ShopConfig;
use crate::util::{SimClock, SimTime};

/// Everything one shop run shares between threads. Built once per run and
/// passed around by `Arc`; there is no global state.
#[derive(Debug)]
pub struct ShopContext {
    run_id: Uuid,
    config: ShopConfig,
    clock: SimClock,
    room: WaitingRoom,
    roster: BarberRoster,
    events: EventBus,
    pub(crate) counters: ShopCounters,
    pub(crate) ledger: ServiceLedger,
}

impl ShopContext {
    /// Build the context and start the simulated clock at opening time.
    pub(crate) fn new(config: ShopConfig, sink: Box<dyn EventSink>) -> Self {
        let clock = SimClock::start(config.opening_time(), config.time_compression);
        Self {
            run_id: Uuid::new_v4(),
            room: WaitingRoom::new(config.chairs),
            roster: BarberRoster::new(config.barbers),
            events: EventBus::new(sink),
            counters: ShopCounters::default(),
            ledger: ServiceLedger::default(),
            clock,
            config,
        }
    }

    /// Identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Configuration the shop was opened with.
    #[must_use]
    pub const fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Simulated clock.
    #[must_use]
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The waiting room.
    #[must_use]
    pub const fn room(&self) -> &WaitingRoom {
        &self.room
    }

    /// Current state of every barber.
    #[must_use]
    pub const fn roster(&self) -> &BarberRoster {
        &self.roster
    }

    /// Live counters.
    #[must_use]
    pub fn stats(&self) -> ShopStats {
        self.counters.snapshot()
    }

    /// Emit an event stamped with the current simulated time.
    pub fn emit(&self, event: ShopEvent) -> u64 {
        self.events.emit(self.clock.now(), event)
    }

    /// Emit an event stamped with `at`.
    pub fn emit_at(&self, at: SimTime, event: ShopEvent) -> u64 {
        self.events.emit(at, event)
    }
}

/// Handle to an open shop. Dropping it without calling [`RunningShop::wait`]
/// leaves the threads running until closing time.
#[derive(Debug)]
pub struct RunningShop {
    ctx: Arc<ShopContext>,
    coordinator: ShutdownCoordinator,
}

impl RunningShop {
    pub(crate) const fn new(ctx: Arc<ShopContext>, coordinator: ShutdownCoordinator) -> Self {
        Self { ctx, coordinator }
    }

    /// Shared context of this run.
    #[must_use]
    pub const fn context(&self) -> &Arc<ShopContext> {
        &self.ctx
    }

    /// Live counters.
    #[must_use]
    pub fn stats(&self) -> ShopStats {
        self.ctx.stats()
    }

    /// Snapshot of every barber's state, indexed by barber number minus one.
    #[must_use]
    pub fn barber_states(&self) -> Vec<BarberState> {
        self.ctx.roster().snapshot()
    }

    /// Block until closing time has passed, the room has drained and every
    /// barber has been joined.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::ThreadPanicked`] if a shop thread panicked and
    /// [`ShopError::InvariantViolation`] if the final counts do not add up.
    pub fn wait(self) -> Result<ShopSummary, ShopError> {
        self.coordinator.wait()
    }
}
