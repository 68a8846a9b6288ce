//! Tests for the event stream and its sinks

use std::sync::Arc;

use prometheus_barbershop::core::{
    BarberId, ChannelEventSink, ClientId, EventBus, EventRecord, InMemoryEventLog, RejectReason, ShopEvent,
};
use prometheus_barbershop::util::SimTime;

#[test]
fn test_event_record_json_shape() {
    let record = EventRecord {
        seq: 4,
        at: SimTime::from_hours(10),
        event: ShopEvent::ClientDropped {
            client: ClientId(3),
            reason: RejectReason::NoChair,
        },
    };
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "seq": 4,
            "at": 36000,
            "event": "client_dropped",
            "client": 3,
            "reason": "no_chair",
        })
    );
}

#[test]
fn test_event_names_match_tags() {
    let events = [
        ShopEvent::BarberIdle { barber: BarberId(1) },
        ShopEvent::BarberServingStart {
            barber: BarberId(2),
            client: ClientId(7),
        },
        ShopEvent::ShopClosed { served: 5, dropped: 1 },
    ];
    for event in events {
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
    }
}

#[test]
fn test_event_display() {
    let event = ShopEvent::BarberServingEnd {
        barber: BarberId(1),
        client: ClientId(12),
    };
    assert_eq!(event.to_string(), "barber_serving_end(barber-1, C12)");
}

#[test]
fn test_channel_sink_preserves_order() {
    let (sink, rx) = ChannelEventSink::new();
    let bus = EventBus::new(Box::new(sink));
    for n in 1..=5 {
        bus.emit(SimTime::from_hours(8), ShopEvent::ClientArrived { client: ClientId(n) });
    }
    let seqs: Vec<u64> = rx.try_iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_concurrent_emitters_get_unique_sequence() {
    let log = Arc::new(InMemoryEventLog::new(4096));
    let bus = Arc::new(EventBus::new(Box::new(Arc::clone(&log))));

    let handles: Vec<_> = (0..4)
        .map(|b| {
            let bus = Arc::clone(&bus);
            std::thread::spawn(move || {
                for _ in 0..250 {
                    bus.emit(SimTime::MIDNIGHT, ShopEvent::BarberIdle { barber: BarberId(b + 1) });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let seqs: Vec<u64> = log.events().iter().map(|r| r.seq).collect();
    assert_eq!(seqs, (1..=1000).collect::<Vec<u64>>());
    assert_eq!(bus.emitted(), 1000);
}
