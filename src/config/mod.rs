//! Configuration models for the shop.

pub mod shop;

pub use shop::{ShopConfig, ENV_PREFIX};
