//! # Prometheus Barbershop
//!
//! A bounded-capacity service-facility scheduler: the classic "sleeping barber".
//!
//! A fixed pool of barbers (dedicated OS threads) serves clients drawn from a
//! waiting room with a fixed number of chairs, over a simulated operating
//! window. Arrivals that find every chair taken are dropped, never queued or
//! retried. At closing time arrivals stop, the clients already waiting are
//! still served, every barber goes home and the shop reports a summary.
//!
//! ## Key Features
//!
//! - **Admission gate**: `WaitingRoom::try_enqueue` checks capacity and inserts
//!   under a single lock, and never blocks
//! - **No polling**: idle barbers sleep on a `parking_lot::Condvar` and are woken
//!   per client or all at once on close
//! - **Graceful drain**: `Take::Closed` is only returned once arrivals are closed
//!   *and* the room is empty
//! - **Explicit context**: one `ShopContext` per run, shared by `Arc`; no globals
//! - **Ordered event stream**: every step is an `EventRecord` with a global
//!   sequence number, logged with `tracing` and sent to a pluggable `EventSink`
//!
//! ```rust,no_run
//! use prometheus_barbershop::builders::ShopBuilder;
//! use prometheus_barbershop::config::ShopConfig;
//! use prometheus_barbershop::core::InMemoryEventLog;
//! use std::sync::Arc;
//!
//! let log = Arc::new(InMemoryEventLog::new(1024));
//! let summary = ShopBuilder::new(ShopConfig::new().with_time_compression(360_000))
//!     .with_event_sink(Arc::clone(&log))
//!     .open()?
//!     .wait()?;
//! assert_eq!(summary.served + summary.dropped, summary.arrivals);
//! # Ok::<(), prometheus_barbershop::core::ShopError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core coordination: waiting room, barbers, arrivals and shutdown.
pub mod core;
/// Configuration models for the shop.
pub mod config;
/// Builders to open shops from configuration.
pub mod builders;
/// Runtime adapters (tokio).
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
