//! Capacity-bounded waiting room: the admission gate and the barber handoff.
//!
//! One `parking_lot::Mutex` guards the queue, the count of suspended barbers and
//! the closed flag; one `Condvar` wakes barbers. Admission (`try_enqueue`) never
//! blocks. Handoff (`take`) blocks until a client is queued or the room is
//! closed and empty.
//!
//! A client queued while barbers are suspended in `take` is already claimed by
//! one of them, so it does not sit on a chair:
//! seated occupancy = `queued - sleeping` (saturating).

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use super::client::Client;
use super::error::{AdmissionRejected, RejectReason};

/// Result of a blocking [`WaitingRoom::take`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Take {
    /// Next client, removed from the room in FIFO order.
    Client(Client),
    /// No more arrivals will come and the room is empty.
    Closed,
}

#[derive(Debug, Default)]
struct RoomState {
    queue: VecDeque<Client>,
    /// Barbers currently suspended inside `take`.
    sleeping: usize,
    closed: bool,
    peak: usize,
}

impl RoomState {
    fn seated(&self) -> usize {
        self.queue.len().saturating_sub(self.sleeping)
    }
}

/// The shared waiting area between the arrival path and the barbers.
#[derive(Debug)]
pub struct WaitingRoom {
    capacity: usize,
    state: Mutex<RoomState>,
    available: Condvar,
}

impl WaitingRoom {
    /// Create a room with `capacity` chairs.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(RoomState {
                queue: VecDeque::with_capacity(capacity.min(1024)),
                ..RoomState::default()
            }),
            available: Condvar::new(),
        }
    }

    /// Number of chairs.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admit `client` if a chair is free (or a barber is asleep), without blocking.
    ///
    /// Returns the seated occupancy after admission.
    ///
    /// # Errors
    ///
    /// Returns the client inside [`AdmissionRejected`] when every chair is taken
    /// or arrivals have been closed.
    pub fn try_enqueue(&self, client: Client) -> Result<usize, AdmissionRejected> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(AdmissionRejected {
                client,
                reason: RejectReason::ShopClosed,
            });
        }
        if state.seated() >= self.capacity {
            return Err(AdmissionRejected {
                client,
                reason: RejectReason::NoChair,
            });
        }
        state.queue.push_back(client);
        let seated = state.seated();
        state.peak = state.peak.max(seated);
        drop(state);
        self.available.notify_one();
        Ok(seated)
    }

    /// Block until a client is available or the room is closed and empty.
    pub fn take(&self) -> Take {
        self.take_with(|| {})
    }

    /// Like [`WaitingRoom::take`], running `on_idle` under the room lock right
    /// before the caller suspends for the first time.
    ///
    /// `on_idle` must not call back into the room.
    pub fn take_with<F>(&self, on_idle: F) -> Take
    where
        F: FnOnce(),
    {
        let mut on_idle = Some(on_idle);
        let mut state = self.state.lock();
        loop {
            if let Some(client) = state.queue.pop_front() {
                return Take::Client(client);
            }
            if state.closed {
                return Take::Closed;
            }
            if let Some(hook) = on_idle.take() {
                hook();
            }
            state.sleeping += 1;
            self.available.wait(&mut state);
            state.sleeping -= 1;
        }
    }

    /// Mark that no further arrivals will be added and wake every suspended barber.
    ///
    /// Clients already waiting stay queued and are still handed out. Returns how
    /// many clients were seated, the same count [`WaitingRoom::occupancy`]
    /// reports; a client already claimed by a sleeping barber is not counted.
    /// Calling it again is harmless.
    pub fn close_arrivals(&self) -> usize {
        let mut state = self.state.lock();
        state.closed = true;
        let waiting = state.seated();
        drop(state);
        self.available.notify_all();
        waiting
    }

    /// Whether arrivals have been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Clients sitting on chairs (queued clients not already claimed by a sleeping barber).
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.state.lock().seated()
    }

    /// Clients queued, including those claimed by a sleeping barber but not yet removed.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Barbers currently suspended in `take`.
    #[must_use]
    pub fn sleeping_barbers(&self) -> usize {
        self.state.lock().sleeping
    }

    /// Highest seated occupancy observed so far.
    #[must_use]
    pub fn peak_occupancy(&self) -> usize {
        self.state.lock().peak
    }
}
