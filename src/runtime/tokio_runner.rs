//! Tokio adapter: runs the blocking shop on tokio's blocking thread pool.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use crate::builders::run_shop;
use crate::config::ShopConfig;
use crate::core::{RunningShop, ShopError, ShopSummary};

fn join_failed(err: &JoinError) -> ShopError {
    ShopError::Internal(format!("shop task failed: {err}"))
}

/// Runs shops on a tokio runtime without blocking its async workers.
#[derive(Clone, Debug)]
pub struct TokioShopRunner {
    handle: Arc<Handle>,
}

impl TokioShopRunner {
    /// Runner bound to a tokio runtime handle.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Runner bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Start a whole shop day on the blocking pool.
    pub fn spawn_shop(&self, config: ShopConfig) -> JoinHandle<Result<ShopSummary, ShopError>> {
        self.handle.spawn_blocking(move || run_shop(config))
    }

    /// Run a whole shop day and await its summary.
    ///
    /// # Errors
    ///
    /// Errors from the shop itself, or [`ShopError::Internal`] if the blocking
    /// task could not be joined.
    pub async fn run_shop(&self, config: ShopConfig) -> Result<ShopSummary, ShopError> {
        self.spawn_shop(config).await.map_err(|e| join_failed(&e))?
    }
}

/// Run a whole shop day on the current tokio runtime.
///
/// # Errors
///
/// See [`TokioShopRunner::run_shop`].
pub async fn run_shop_async(config: ShopConfig) -> Result<ShopSummary, ShopError> {
    TokioShopRunner::current().run_shop(config).await
}

impl RunningShop {
    /// Async counterpart of [`RunningShop::wait`]; the join happens on tokio's
    /// blocking pool.
    ///
    /// # Errors
    ///
    /// See [`RunningShop::wait`].
    pub async fn wait_async(self) -> Result<ShopSummary, ShopError> {
        tokio::task::spawn_blocking(move || self.wait())
            .await
            .map_err(|e| join_failed(&e))?
    }
}
