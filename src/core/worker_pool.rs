//! Barber pool: one dedicated OS thread per barber.
//!
//! Each barber loops idle → serving → idle. While idle it is suspended inside
//! [`WaitingRoom::take_with`](super::waiting_room::WaitingRoom::take_with), never
//! polling. It goes home once the room reports [`Take::Closed`].

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use super::client::{BarberId, Client, ClientId};
use super::error::ShopError;
use super::events::ShopEvent;
use super::shop::ShopContext;
use super::waiting_room::Take;
use crate::config::ShopConfig;
use crate::util::SimClock;

/// What a barber is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "client", rename_all = "snake_case")]
pub enum BarberState {
    /// Waiting for a client.
    Idle,
    /// Cutting this client's hair.
    Serving(ClientId),
    /// Gone home.
    Terminated,
}

/// Shared view of every barber's state.
#[derive(Debug)]
pub struct BarberRoster {
    states: RwLock<Vec<BarberState>>,
}

impl BarberRoster {
    /// Roster of `barbers` idle barbers.
    #[must_use]
    pub fn new(barbers: usize) -> Self {
        Self {
            states: RwLock::new(vec![BarberState::Idle; barbers]),
        }
    }

    pub(crate) fn set(&self, barber: BarberId, state: BarberState) {
        let mut states = self.states.write();
        if let Some(slot) = barber.index().and_then(|i| states.get_mut(i)) {
            *slot = state;
        }
    }

    /// State of one barber.
    #[must_use]
    pub fn get(&self, barber: BarberId) -> Option<BarberState> {
        let states = self.states.read();
        barber.index().and_then(|i| states.get(i).copied())
    }

    /// Snapshot of every barber's state.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BarberState> {
        self.states.read().clone()
    }

    /// Whether every barber has gone home.
    #[must_use]
    pub fn all_terminated(&self) -> bool {
        self.states
            .read()
            .iter()
            .all(|state| *state == BarberState::Terminated)
    }
}

/// Performs one haircut.
///
/// Called on the barber's own thread; the call blocks that barber (and only
/// that barber) for the length of the service. One clone is handed to each
/// barber.
pub trait ServiceExecutor: Send + Sync + Clone + 'static {
    /// Serve `client` to completion.
    fn serve(&self, barber: BarberId, client: &Client, clock: &SimClock);
}

/// Default service: takes a fixed simulated duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedService {
    duration: Duration,
}

impl TimedService {
    /// Service lasting `duration` of simulated time.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Service lasting the configured haircut duration.
    #[must_use]
    pub const fn from_config(config: &ShopConfig) -> Self {
        Self::new(config.haircut_duration())
    }

    /// Simulated duration of one service.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl ServiceExecutor for TimedService {
    fn serve(&self, _barber: BarberId, _client: &Client, clock: &SimClock) {
        clock.sleep(self.duration);
    }
}

/// Running barber threads.
#[derive(Debug)]
pub struct WorkerPool {
    barbers: Vec<(BarberId, JoinHandle<()>)>,
}

impl WorkerPool {
    /// Spawn one thread per configured barber.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Spawn`] if a thread cannot be created. Barbers that
    /// were already started are sent home and joined first.
    pub fn spawn<E: ServiceExecutor>(ctx: &Arc<ShopContext>, executor: &E) -> Result<Self, ShopError> {
        let count = ctx.config().barbers;
        let mut barbers = Vec::with_capacity(count);

        for n in 1..=count {
            let id = BarberId(n);
            match spawn_barber(id, Arc::clone(ctx), executor.clone()) {
                Ok(handle) => barbers.push((id, handle)),
                Err(source) => {
                    error!(barber = %id, error = %source, "failed to spawn barber thread");
                    ctx.room().close_arrivals();
                    let _ = Self { barbers }.join();
                    return Err(ShopError::Spawn {
                        role: id.to_string(),
                        source,
                    });
                }
            }
        }

        info!(
            barbers = count,
            chairs = ctx.config().chairs,
            "barber pool started with dedicated OS threads"
        );
        Ok(Self { barbers })
    }

    /// Number of barber threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.barbers.len()
    }

    /// Whether the pool has no barbers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.barbers.is_empty()
    }

    /// Join every barber. Only returns once the room has been closed and drained.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::ThreadPanicked`] naming the first barber that
    /// panicked; every other barber is still joined.
    pub fn join(self) -> Result<usize, ShopError> {
        let mut joined = 0;
        let mut panicked = None;
        for (id, handle) in self.barbers {
            if handle.join().is_ok() {
                debug!(barber = %id, "barber joined");
                joined += 1;
            } else {
                warn!(barber = %id, "barber thread panicked");
                panicked.get_or_insert(id);
            }
        }
        match panicked {
            Some(id) => Err(ShopError::ThreadPanicked(id.to_string())),
            None => Ok(joined),
        }
    }
}

fn spawn_barber<E: ServiceExecutor>(
    id: BarberId,
    ctx: Arc<ShopContext>,
    executor: E,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(id.to_string())
        .spawn(move || {
            let _span = info_span!("barber", run_id = %ctx.run_id(), barber = %id).entered();
            barber_loop(id, &ctx, &executor);
        })
}

fn barber_loop<E: ServiceExecutor>(id: BarberId, ctx: &ShopContext, executor: &E) {
    ctx.roster().set(id, BarberState::Idle);
    ctx.emit(ShopEvent::BarberStarted { barber: id });

    loop {
        let next = ctx.room().take_with(|| {
            ctx.emit(ShopEvent::BarberIdle { barber: id });
        });
        match next {
            Take::Client(client) => serve_one(id, ctx, executor, &client),
            Take::Closed => break,
        }
    }

    ctx.roster().set(id, BarberState::Terminated);
    ctx.emit(ShopEvent::BarberTerminated { barber: id });
}

fn serve_one<E: ServiceExecutor>(id: BarberId, ctx: &ShopContext, executor: &E, client: &Client) {
    ctx.roster().set(id, BarberState::Serving(client.id));
    ctx.counters.in_service.fetch_add(1, Ordering::AcqRel);
    if !ctx.ledger.begin(client.id) {
        error!(barber = %id, client = %client.id, "client delivered to a second barber");
    }
    ctx.emit(ShopEvent::BarberServingStart {
        barber: id,
        client: client.id,
    });

    executor.serve(id, client, ctx.clock());

    ctx.counters.served.fetch_add(1, Ordering::AcqRel);
    ctx.counters.in_service.fetch_sub(1, Ordering::AcqRel);
    ctx.emit(ShopEvent::BarberServingEnd {
        barber: id,
        client: client.id,
    });
    ctx.roster().set(id, BarberState::Idle);
}
