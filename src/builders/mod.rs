//! Builders to open shops from configuration.

pub mod shop_builder;

pub use shop_builder::{run_shop, ShopBuilder};
