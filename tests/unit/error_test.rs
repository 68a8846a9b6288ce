//! Tests for error types

use std::io;

use prometheus_barbershop::core::{AdmissionRejected, AppResult, Client, ClientId, RejectReason, ShopError};
use prometheus_barbershop::util::SimTime;

#[test]
fn test_invalid_config_error() {
    let err = ShopError::InvalidConfig("barbers must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: barbers must be greater than 0"
    );
}

#[test]
fn test_spawn_error_keeps_source() {
    let err = ShopError::Spawn {
        role: "barber-2".to_string(),
        source: io::Error::new(io::ErrorKind::WouldBlock, "out of threads"),
    };
    assert_eq!(format!("{}", err), "failed to spawn barber-2 thread: out of threads");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_thread_panicked_error() {
    let err = ShopError::ThreadPanicked("shop-clock".to_string());
    assert_eq!(format!("{}", err), "thread panicked: shop-clock");
}

#[test]
fn test_rejection_returns_client() {
    let client = Client::new(ClientId(9), SimTime::from_hours(18));
    let err = AdmissionRejected {
        client: client.clone(),
        reason: RejectReason::ShopClosed,
    };
    assert_eq!(err.client, client);
    assert_eq!(format!("{}", err), "client C9 rejected: shop_closed");
}

#[test]
fn test_shop_error_converts_into_anyhow() {
    fn open() -> AppResult<()> {
        Err(ShopError::Internal("boom".to_string()).into())
    }
    let err = open().unwrap_err();
    assert!(err.downcast_ref::<ShopError>().is_some());
}
