//! Core shop coordination: admission, barbers, arrivals and shutdown.

pub mod client;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod shop;
pub mod shutdown;
pub mod stats;
pub mod waiting_room;
pub mod worker_pool;

pub use client::{BarberId, Client, ClientId};
pub use error::{AdmissionRejected, AppResult, RejectReason, ShopError};
pub use events::{
    ChannelEventSink, EventBus, EventRecord, EventSink, InMemoryEventLog, ShopEvent, TracingOnlySink,
};
pub use scheduler::{Arrival, ArrivalDesk, ArrivalPlan, ClosingNotice, ClosingSignal, Scheduler};
pub use shop::{RunningShop, ShopContext};
pub use shutdown::ShutdownCoordinator;
pub use stats::{ShopStats, ShopSummary};
pub use waiting_room::{Take, WaitingRoom};
pub use worker_pool::{BarberRoster, BarberState, ServiceExecutor, TimedService, WorkerPool};
