//! Client and barber identities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::SimTime;

/// Sequential client identifier, starting at 1 for each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Barber identifier, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarberId(pub usize);

impl BarberId {
    /// Roster slot, `None` for the invalid id 0.
    pub(crate) const fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl fmt::Display for BarberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "barber-{}", self.0)
    }
}

/// A unit of work waiting for service.
///
/// The token moves from the arrival path into the room and from the room into
/// exactly one barber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Identity.
    pub id: ClientId,
    /// When the client walked in.
    pub arrived_at: SimTime,
}

impl Client {
    /// Create a client token.
    #[must_use]
    pub const fn new(id: ClientId, arrived_at: SimTime) -> Self {
        Self { id, arrived_at }
    }
}
