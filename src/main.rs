//! Runs one barbershop day and prints its summary as JSON.
//!
//! Configuration comes from the JSON file named by `BARBERSHOP_CONFIG`, or else
//! from `BARBERSHOP_*` variables (a `.env` file is loaded first). Logging is
//! controlled with `RUST_LOG`.

use std::fs;

use anyhow::Context;
use prometheus_barbershop::builders::run_shop;
use prometheus_barbershop::config::ShopConfig;
use prometheus_barbershop::core::AppResult;
use prometheus_barbershop::util::init_tracing;
use tracing::info;

fn load_config() -> AppResult<ShopConfig> {
    if let Ok(path) = std::env::var("BARBERSHOP_CONFIG") {
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        return ShopConfig::from_json_str(&raw).map_err(|e| anyhow::anyhow!("{path}: {e}"));
    }
    ShopConfig::from_env().map_err(|e| anyhow::anyhow!(e))
}

fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = load_config()?;
    info!(?config, "starting barbershop");

    let summary = run_shop(config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
