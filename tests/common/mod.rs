//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use prometheus_barbershop::config::ShopConfig;
use prometheus_barbershop::core::{BarberId, Client, ClientId, EventRecord, ServiceExecutor, ShopEvent};
use prometheus_barbershop::util::SimClock;

pub const TIMEOUT: Duration = Duration::from_secs(10);

/// One simulated hour per real millisecond.
pub const FAST: u32 = 3_600_000;

pub fn fast_config(barbers: usize, chairs: usize) -> ShopConfig {
    ShopConfig::new()
        .with_barbers(barbers)
        .with_chairs(chairs)
        .with_time_compression(FAST)
}

/// Executor whose haircuts only finish when the test releases them.
///
/// Each started haircut is reported on `started`; each `()` sent through the
/// release handle lets exactly one haircut (on any barber) finish.
#[derive(Clone)]
pub struct GateExecutor {
    started: Sender<(BarberId, ClientId)>,
    release: Receiver<()>,
}

pub struct Gate {
    pub started: Receiver<(BarberId, ClientId)>,
    release: Sender<()>,
}

impl GateExecutor {
    pub fn new() -> (Self, Gate) {
        let (started_tx, started_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        (
            Self {
                started: started_tx,
                release: release_rx,
            },
            Gate {
                started: started_rx,
                release: release_tx,
            },
        )
    }
}

impl ServiceExecutor for GateExecutor {
    fn serve(&self, barber: BarberId, client: &Client, _clock: &SimClock) {
        let _ = self.started.send((barber, client.id));
        // Bounded so a failing test cannot hang the suite.
        let _ = self.release.recv_timeout(TIMEOUT);
    }
}

impl Gate {
    /// Wait until the next haircut starts.
    pub fn next_start(&self) -> (BarberId, ClientId) {
        self.started
            .recv_timeout(TIMEOUT)
            .expect("haircut did not start in time")
    }

    /// Let `n` haircuts finish.
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            self.release.send(()).expect("executor gone");
        }
    }
}

/// Reads the channel event sink while remembering everything seen.
pub struct EventTap {
    rx: Receiver<EventRecord>,
    seen: Vec<EventRecord>,
}

impl EventTap {
    pub fn new(rx: Receiver<EventRecord>) -> Self {
        Self { rx, seen: Vec::new() }
    }

    /// Consume events until one matches, returning it.
    pub fn wait_for<F>(&mut self, mut pred: F) -> EventRecord
    where
        F: FnMut(&ShopEvent) -> bool,
    {
        let deadline = Instant::now() + TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(record) => {
                    self.seen.push(record.clone());
                    if pred(&record.event) {
                        return record;
                    }
                }
                Err(RecvTimeoutError::Timeout) => panic!("expected event never arrived; seen: {:?}", self.seen),
                Err(RecvTimeoutError::Disconnected) => panic!("event stream closed; seen: {:?}", self.seen),
            }
        }
    }

    /// Wait until `n` barbers have gone to sleep.
    pub fn wait_for_idle(&mut self, n: usize) {
        for _ in 0..n {
            self.wait_for(|e| matches!(e, ShopEvent::BarberIdle { .. }));
        }
    }

    /// Everything seen so far plus whatever is still buffered.
    pub fn drain(mut self) -> Vec<EventRecord> {
        self.seen.extend(self.rx.try_iter());
        self.seen
    }
}

/// Events only, in stream order.
pub fn kinds(records: &[EventRecord]) -> Vec<ShopEvent> {
    records.iter().map(|r| r.event.clone()).collect()
}
