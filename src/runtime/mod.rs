//! Runtime adapters for driving shops from async code.

pub mod tokio_runner;

pub use tokio_runner::{run_shop_async, TokioShopRunner};
