//! Tests for configuration validation and loading

use std::collections::HashMap;
use std::time::Duration;

use prometheus_barbershop::config::ShopConfig;
use prometheus_barbershop::util::SimTime;

#[test]
fn test_defaults() {
    let config = ShopConfig::default();
    assert_eq!(config.barbers, 2);
    assert_eq!(config.chairs, 5);
    assert_eq!(config.opening_time(), SimTime::from_hours(8));
    assert_eq!(config.closing_time(), SimTime::from_hours(20));
    assert_eq!(config.client_interval(), Duration::from_secs(2 * 3600));
    assert_eq!(config.haircut_duration(), Duration::from_secs(30 * 60));
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_barbers_invalid() {
    assert!(ShopConfig::new().with_barbers(0).validate().is_err());
}

#[test]
fn test_zero_chairs_invalid() {
    assert!(ShopConfig::new().with_chairs(0).validate().is_err());
}

#[test]
fn test_closing_must_follow_opening() {
    let config = ShopConfig::new()
        .with_operating_window(Duration::from_secs(12 * 3600), Duration::from_secs(12 * 3600));
    let err = config.validate().unwrap_err();
    assert!(err.contains("closing time"), "{err}");
}

#[test]
fn test_window_must_fit_in_one_day() {
    let config = ShopConfig::new()
        .with_operating_window(Duration::from_secs(8 * 3600), Duration::from_secs(u64::MAX))
        .with_time_compression(1);
    let err = config.validate().unwrap_err();
    assert!(err.contains("end of the day"), "{err}");

    let midnight = ShopConfig::new()
        .with_operating_window(Duration::from_secs(20 * 3600), Duration::from_secs(24 * 3600));
    assert!(midnight.validate().is_ok());
}

#[test]
fn test_zero_interval_and_compression_invalid() {
    assert!(ShopConfig::new()
        .with_client_interval(Duration::ZERO)
        .validate()
        .is_err());
    assert!(ShopConfig::new().with_time_compression(0).validate().is_err());
}

#[test]
fn test_zero_haircut_is_allowed() {
    assert!(ShopConfig::new()
        .with_haircut_duration(Duration::ZERO)
        .validate()
        .is_ok());
}

#[test]
fn test_from_json_fills_defaults() {
    let config = ShopConfig::from_json_str(r#"{"barbers": 3, "chairs": 1}"#).unwrap();
    assert_eq!(config.barbers, 3);
    assert_eq!(config.chairs, 1);
    assert_eq!(config.closing_time_secs, 20 * 3600);
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(ShopConfig::from_json_str(r#"{"chairs": 0}"#).is_err());
    let err = ShopConfig::from_json_str("{not json").unwrap_err();
    assert!(err.starts_with("parse error"), "{err}");
}

#[test]
fn test_from_lookup_overrides() {
    let vars: HashMap<&str, &str> = [
        ("BARBERSHOP_BARBERS", "4"),
        ("BARBERSHOP_CHAIRS", " 2 "),
        ("BARBERSHOP_TIME_COMPRESSION", "60"),
    ]
    .into_iter()
    .collect();
    let config = ShopConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.barbers, 4);
    assert_eq!(config.chairs, 2);
    assert_eq!(config.time_compression, 60);
    assert_eq!(config.opening_time_secs, 8 * 3600);
}

#[test]
fn test_from_lookup_names_bad_variable() {
    let err = ShopConfig::from_lookup(|key| {
        (key == "BARBERSHOP_CHAIRS").then(|| "lots".to_string())
    })
    .unwrap_err();
    assert!(err.contains("BARBERSHOP_CHAIRS"), "{err}");
}
