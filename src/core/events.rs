//! Shop event stream and sinks.
//!
//! Every observable step of a run is emitted as an [`EventRecord`] through the
//! [`EventBus`], which stamps a sequence number and logs it with `tracing`
//! before handing it to the configured [`EventSink`]. Sequence numbers form a
//! total order across all emitting threads.

use std::collections::VecDeque;
use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::{BarberId, ClientId};
use super::error::RejectReason;
use crate::util::SimTime;

/// Observable shop events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShopEvent {
    /// Doors open; barbers are about to start.
    ShopOpened {
        /// Barber count.
        barbers: usize,
        /// Chair count.
        chairs: usize,
    },
    /// A barber thread began its shift.
    BarberStarted {
        /// Barber.
        barber: BarberId,
    },
    /// A client walked in (before admission is decided).
    ClientArrived {
        /// Client.
        client: ClientId,
    },
    /// A client was turned away.
    ClientDropped {
        /// Client.
        client: ClientId,
        /// Why.
        reason: RejectReason,
    },
    /// A barber found the room empty and went to sleep.
    BarberIdle {
        /// Barber.
        barber: BarberId,
    },
    /// A barber started a haircut.
    BarberServingStart {
        /// Barber.
        barber: BarberId,
        /// Client in the chair.
        client: ClientId,
    },
    /// A barber finished a haircut.
    BarberServingEnd {
        /// Barber.
        barber: BarberId,
        /// Client that was served.
        client: ClientId,
    },
    /// Closing time: no further arrivals; `waiting` clients are left to drain.
    ArrivalsStopped {
        /// Clients seated in the room when arrivals stopped.
        waiting: usize,
    },
    /// A barber observed the closed, empty room and went home.
    BarberTerminated {
        /// Barber.
        barber: BarberId,
    },
    /// Every barber has been joined.
    ShopClosed {
        /// Clients served.
        served: u64,
        /// Clients turned away.
        dropped: u64,
    },
    /// Closing failed: a thread panicked or the final accounting did not add up.
    ShopFailed {
        /// Clients served before the failure was detected.
        served: u64,
        /// Clients turned away.
        dropped: u64,
        /// What went wrong.
        error: String,
    },
}

impl ShopEvent {
    /// Snake-case event name, matching the serialized tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ShopOpened { .. } => "shop_opened",
            Self::BarberStarted { .. } => "barber_started",
            Self::ClientArrived { .. } => "client_arrived",
            Self::ClientDropped { .. } => "client_dropped",
            Self::BarberIdle { .. } => "barber_idle",
            Self::BarberServingStart { .. } => "barber_serving_start",
            Self::BarberServingEnd { .. } => "barber_serving_end",
            Self::ArrivalsStopped { .. } => "arrivals_stopped",
            Self::BarberTerminated { .. } => "barber_terminated",
            Self::ShopClosed { .. } => "shop_closed",
            Self::ShopFailed { .. } => "shop_failed",
        }
    }
}

impl fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShopOpened { barbers, chairs } => {
                write!(f, "shop_opened(barbers={barbers}, chairs={chairs})")
            }
            Self::BarberStarted { barber } => write!(f, "barber_started({barber})"),
            Self::ClientArrived { client } => write!(f, "client_arrived({client})"),
            Self::ClientDropped { client, reason } => write!(f, "client_dropped({client}, {reason})"),
            Self::BarberIdle { barber } => write!(f, "barber_idle({barber})"),
            Self::BarberServingStart { barber, client } => {
                write!(f, "barber_serving_start({barber}, {client})")
            }
            Self::BarberServingEnd { barber, client } => {
                write!(f, "barber_serving_end({barber}, {client})")
            }
            Self::ArrivalsStopped { waiting } => write!(f, "arrivals_stopped(waiting={waiting})"),
            Self::BarberTerminated { barber } => write!(f, "barber_terminated({barber})"),
            Self::ShopClosed { served, dropped } => {
                write!(f, "shop_closed(served={served}, dropped={dropped})")
            }
            Self::ShopFailed { served, dropped, error } => {
                write!(f, "shop_failed(served={served}, dropped={dropped}): {error}")
            }
        }
    }
}

/// An emitted event with its position in the stream and simulated timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the stream, starting at 1.
    pub seq: u64,
    /// Simulated time of the event.
    pub at: SimTime,
    /// The event.
    #[serde(flatten)]
    pub event: ShopEvent,
}

/// Destination for event records.
///
/// Called while the bus holds its ordering lock, so implementations must not block.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, record: EventRecord);
}

/// Sink that only relies on the bus's `tracing` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOnlySink;

impl EventSink for TracingOnlySink {
    fn record(&self, _record: EventRecord) {}
}

/// In-memory sink keeping the most recent `max_events` records.
#[derive(Debug)]
pub struct InMemoryEventLog {
    events: Mutex<VecDeque<EventRecord>>,
    max_events: usize,
}

impl InMemoryEventLog {
    /// Create a log with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Snapshot of stored records, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().iter().cloned().collect()
    }

    /// Snapshot of stored events without their envelope.
    #[must_use]
    pub fn kinds(&self) -> Vec<ShopEvent> {
        self.events.lock().iter().map(|r| r.event.clone()).collect()
    }
}

impl EventSink for InMemoryEventLog {
    fn record(&self, record: EventRecord) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(record);
    }
}

/// Sink forwarding records over an unbounded crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<EventRecord>,
}

impl ChannelEventSink {
    /// Create a sink and the receiving end of its stream.
    #[must_use]
    pub fn new() -> (Self, Receiver<EventRecord>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, record: EventRecord) {
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(record);
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn record(&self, record: EventRecord) {
        (**self).record(record);
    }
}

/// Orders, logs and dispatches shop events.
pub struct EventBus {
    sink: Box<dyn EventSink>,
    seq: Mutex<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("seq", &*self.seq.lock())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a bus dispatching to `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self {
            sink,
            seq: Mutex::new(0),
        }
    }

    /// Stamp, log and dispatch an event. Returns its sequence number.
    pub fn emit(&self, at: SimTime, event: ShopEvent) -> u64 {
        let mut seq = self.seq.lock();
        *seq += 1;
        let n = *seq;
        match &event {
            ShopEvent::ShopOpened { .. }
            | ShopEvent::ArrivalsStopped { .. }
            | ShopEvent::ShopClosed { .. } => {
                info!(seq = n, at = %at, event = event.name(), "{event}");
            }
            ShopEvent::ShopFailed { .. } => warn!(seq = n, at = %at, event = event.name(), "{event}"),
            _ => debug!(seq = n, at = %at, event = event.name(), "{event}"),
        }
        self.sink.record(EventRecord { seq: n, at, event });
        n
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        *self.seq.lock()
    }
}
