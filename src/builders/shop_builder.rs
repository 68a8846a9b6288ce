//! Builder that opens a shop from configuration.

use std::sync::Arc;

use tracing::info;

use crate::config::ShopConfig;
use crate::core::{
    ArrivalDesk, ArrivalPlan, ClosingSignal, EventSink, RunningShop, Scheduler, ServiceExecutor, ShopContext,
    ShopError, ShopEvent, ShopSummary, ShutdownCoordinator, TimedService, TracingOnlySink, WorkerPool,
};

/// Opens a shop: validates configuration, builds the shared context, starts the
/// barbers and (optionally) the clock-driven scheduler.
pub struct ShopBuilder<E = TimedService> {
    config: ShopConfig,
    executor: E,
    sink: Box<dyn EventSink>,
}

impl ShopBuilder<TimedService> {
    /// Builder for `config`, serving with [`TimedService`] and logging events
    /// through `tracing` only.
    #[must_use]
    pub fn new(config: ShopConfig) -> Self {
        Self {
            executor: TimedService::from_config(&config),
            sink: Box::new(TracingOnlySink),
            config,
        }
    }
}

impl<E: ServiceExecutor> ShopBuilder<E> {
    /// Replace the service performed by each barber.
    #[must_use]
    pub fn with_executor<F: ServiceExecutor>(self, executor: F) -> ShopBuilder<F> {
        ShopBuilder {
            config: self.config,
            executor,
            sink: self.sink,
        }
    }

    /// Send events to `sink` (in addition to `tracing`).
    #[must_use]
    pub fn with_event_sink<S: EventSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Open the shop with arrivals driven by the simulated clock.
    ///
    /// # Errors
    ///
    /// [`ShopError::InvalidConfig`] for a bad configuration,
    /// [`ShopError::Spawn`] if a thread cannot be started.
    pub fn open(self) -> Result<RunningShop, ShopError> {
        let plan = ArrivalPlan::from_config(&self.config);
        let (ctx, pool, signal, closing) = self.start()?;

        let desk = ArrivalDesk::new(Arc::clone(&ctx), signal);
        let scheduler = match Scheduler::new(desk, plan).spawn() {
            Ok(handle) => handle,
            Err(err) => {
                ctx.room().close_arrivals();
                let _ = pool.join();
                return Err(err);
            }
        };

        let coordinator = ShutdownCoordinator::new(Arc::clone(&ctx), closing, Some(scheduler), pool);
        Ok(RunningShop::new(ctx, coordinator))
    }

    /// Open the shop without a scheduler; the caller drives arrivals through
    /// the returned [`ArrivalDesk`] and closes it with [`ArrivalDesk::close`].
    ///
    /// # Errors
    ///
    /// Same as [`ShopBuilder::open`].
    pub fn open_manual(self) -> Result<(RunningShop, ArrivalDesk), ShopError> {
        let (ctx, pool, signal, closing) = self.start()?;
        let desk = ArrivalDesk::new(Arc::clone(&ctx), signal);
        let coordinator = ShutdownCoordinator::new(Arc::clone(&ctx), closing, None, pool);
        Ok((RunningShop::new(ctx, coordinator), desk))
    }

    #[allow(clippy::type_complexity)]
    fn start(
        self,
    ) -> Result<
        (
            Arc<ShopContext>,
            WorkerPool,
            ClosingSignal,
            crossbeam_channel::Receiver<crate::core::ClosingNotice>,
        ),
        ShopError,
    > {
        self.config.validate().map_err(ShopError::InvalidConfig)?;

        let ctx = Arc::new(ShopContext::new(self.config, self.sink));
        info!(
            run_id = %ctx.run_id(),
            opening = %ctx.config().opening_time(),
            closing = %ctx.config().closing_time(),
            "opening shop"
        );
        ctx.emit(ShopEvent::ShopOpened {
            barbers: ctx.config().barbers,
            chairs: ctx.config().chairs,
        });

        let pool = WorkerPool::spawn(&ctx, &self.executor)?;
        let (signal, closing) = ClosingSignal::channel();
        Ok((ctx, pool, signal, closing))
    }
}

/// Run a whole shop day with the default service and return its summary.
///
/// # Errors
///
/// See [`ShopBuilder::open`] and [`RunningShop::wait`].
pub fn run_shop(config: ShopConfig) -> Result<ShopSummary, ShopError> {
    ShopBuilder::new(config).open()?.wait()
}
