//! Shared utilities.

pub mod clock;
pub mod telemetry;

pub use clock::{SimClock, SimTime};
pub use telemetry::{init_tracing, init_tracing_with, DEFAULT_FILTER};
