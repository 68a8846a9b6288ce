//! Simulated time for the shop.
//!
//! Simulated time runs `time_compression` times faster than the wall clock, so a
//! twelve hour business day can be replayed in a few milliseconds.

use std::fmt;
use std::ops::{Add, Sub};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;

/// A point in simulated time, in whole seconds since midnight of the shop day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Build from seconds since midnight.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Build from whole hours since midnight.
    #[must_use]
    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * SECS_PER_HOUR)
    }

    /// Seconds since midnight.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Offset from midnight as a `Duration`.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }

    /// Time elapsed since `earlier`, zero if `earlier` is later.
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        Duration::from_secs(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.as_secs()))
    }
}

impl Sub for SimTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.saturating_since(rhs)
    }
}

impl From<Duration> for SimTime {
    fn from(offset: Duration) -> Self {
        Self(offset.as_secs())
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / SECS_PER_HOUR;
        let minutes = (self.0 % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = self.0 % SECS_PER_MINUTE;
        if seconds == 0 {
            write!(f, "{hours:02}:{minutes:02}")
        } else {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}

/// Simulated clock anchored at the shop's opening time.
///
/// `now()` maps elapsed wall time onto simulated time; `sleep` maps a simulated
/// duration back onto a real sleep of `duration / compression`.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    origin: SimTime,
    started: Instant,
    compression: u32,
}

impl SimClock {
    /// Start a clock reading `origin` right now.
    ///
    /// A compression of zero is treated as one (real time).
    #[must_use]
    pub fn start(origin: SimTime, compression: u32) -> Self {
        Self {
            origin,
            started: Instant::now(),
            compression: compression.max(1),
        }
    }

    /// Simulated seconds per real second.
    #[must_use]
    pub const fn compression(&self) -> u32 {
        self.compression
    }

    /// Simulated time the clock was started at.
    #[must_use]
    pub const fn origin(&self) -> SimTime {
        self.origin
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> SimTime {
        let elapsed = self.started.elapsed().saturating_mul(self.compression);
        self.origin + elapsed
    }

    /// Real duration that corresponds to `simulated`.
    #[must_use]
    pub fn to_real(&self, simulated: Duration) -> Duration {
        simulated / self.compression
    }

    /// Suspend the calling thread for a simulated duration.
    pub fn sleep(&self, simulated: Duration) {
        let real = self.to_real(simulated);
        if !real.is_zero() {
            thread::sleep(real);
        }
    }

    /// Suspend the calling thread until the clock reads at least `deadline`.
    ///
    /// Returns at once if `deadline` lies beyond what `Instant` can represent.
    pub fn sleep_until(&self, deadline: SimTime) {
        let offset = self.to_real(deadline.saturating_since(self.origin));
        let Some(target) = self.started.checked_add(offset) else {
            return;
        };
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }
}
