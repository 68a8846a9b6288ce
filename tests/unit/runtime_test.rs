//! Tests for the tokio adapter

use prometheus_barbershop::builders::ShopBuilder;
use prometheus_barbershop::config::ShopConfig;
use prometheus_barbershop::runtime::{run_shop_async, TokioShopRunner};

fn quick_day() -> ShopConfig {
    ShopConfig::new().with_time_compression(3_600_000)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_shop_async() {
    let summary = run_shop_async(quick_day()).await.expect("shop summary");
    assert_eq!(summary.arrivals, 6);
    assert!(summary.is_balanced());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_runner_spawns_independent_shops() {
    let runner = TokioShopRunner::current();
    let first = runner.spawn_shop(quick_day().with_barbers(1));
    let second = runner.spawn_shop(quick_day().with_chairs(1));

    let first = first.await.expect("join").expect("shop summary");
    let second = second.await.expect("join").expect("shop summary");
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.barbers, 1);
    assert_eq!(second.chairs, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_async_after_manual_close() {
    let (shop, desk) = ShopBuilder::new(quick_day()).open_manual().expect("open");
    assert!(desk.arrive().is_admitted());
    desk.close();

    let summary = shop.wait_async().await.expect("shop summary");
    assert_eq!(summary.arrivals, 1);
    assert_eq!(summary.served, 1);
}

#[tokio::test]
async fn test_invalid_config_surfaces_through_runner() {
    let err = TokioShopRunner::current()
        .run_shop(ShopConfig::new().with_chairs(0))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid configuration"));
}
