use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{EnemyDestroyed, EventBus};

#[test]
fn publish_reaches_every_subscriber_exactly_once() {
    let mut bus = EventBus::<EnemyDestroyed>::default();

    let first = Arc::new(AtomicI32::new(0));
    let second = Arc::new(AtomicI32::new(0));

    let sink = Arc::clone(&first);
    bus.subscribe(move |ev| {
        sink.fetch_add(ev.reward, Ordering::Relaxed);
    });
    let sink = Arc::clone(&second);
    bus.subscribe(move |ev| {
        sink.fetch_add(ev.reward, Ordering::Relaxed);
    });

    bus.publish(EnemyDestroyed { reward: 200 });

    // Both fired once, synchronously, before publish returned.
    assert_eq!(first.load(Ordering::Relaxed), 200);
    assert_eq!(second.load(Ordering::Relaxed), 200);
}

#[test]
fn unsubscribe_removes_exactly_that_registration() {
    let mut bus = EventBus::<EnemyDestroyed>::default();

    let kept = Arc::new(AtomicUsize::new(0));
    let dropped = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&dropped);
    let token = bus.subscribe(move |_| {
        sink.fetch_add(1, Ordering::Relaxed);
    });
    let sink = Arc::clone(&kept);
    bus.subscribe(move |_| {
        sink.fetch_add(1, Ordering::Relaxed);
    });

    assert!(bus.unsubscribe(token));
    // Stale token: nothing left to remove.
    assert!(!bus.unsubscribe(token));

    bus.publish(EnemyDestroyed { reward: 100 });

    assert_eq!(dropped.load(Ordering::Relaxed), 0);
    assert_eq!(kept.load(Ordering::Relaxed), 1);
}

#[test]
fn duplicate_subscription_fires_twice_per_publish() {
    let mut bus = EventBus::<EnemyDestroyed>::default();

    let hits = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&hits);
    let callback = move |_: &EnemyDestroyed| {
        sink.fetch_add(1, Ordering::Relaxed);
    };

    let a = bus.subscribe(callback.clone());
    let b = bus.subscribe(callback);
    assert_ne!(a, b);

    bus.publish(EnemyDestroyed { reward: 100 });
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}

#[test]
fn subscribers_run_in_registration_order() {
    let mut bus = EventBus::<EnemyDestroyed>::default();
    let order = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let log = Arc::clone(&order);
        bus.subscribe(move |_| log.lock().unwrap().push(label));
    }

    bus.publish(EnemyDestroyed { reward: 100 });
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn publish_without_subscribers_is_a_noop() {
    let mut bus = EventBus::<EnemyDestroyed>::default();
    bus.publish(EnemyDestroyed { reward: 100 });
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn events_sent_from_a_callback_are_delivered_before_publish_returns() {
    let mut bus = EventBus::<EnemyDestroyed>::default();
    let total = Arc::new(AtomicI32::new(0));

    // First subscriber re-publishes a follow-up event once.
    let sender = bus.sender();
    let fired = Arc::new(AtomicUsize::new(0));
    let once = Arc::clone(&fired);
    bus.subscribe(move |_| {
        if once.fetch_add(1, Ordering::Relaxed) == 0 {
            sender.send(EnemyDestroyed { reward: 7 });
        }
    });
    let sink = Arc::clone(&total);
    bus.subscribe(move |ev| {
        sink.fetch_add(ev.reward, Ordering::Relaxed);
    });

    bus.publish(EnemyDestroyed { reward: 100 });

    // Both the outer and the nested event were dispatched synchronously.
    assert_eq!(total.load(Ordering::Relaxed), 107);
    assert_eq!(fired.load(Ordering::Relaxed), 2);
}

#[test]
fn sender_events_outside_a_publish_wait_for_the_pump() {
    let mut bus = EventBus::<EnemyDestroyed>::default();
    let total = Arc::new(AtomicI32::new(0));

    let sink = Arc::clone(&total);
    bus.subscribe(move |ev| {
        sink.fetch_add(ev.reward, Ordering::Relaxed);
    });

    bus.sender().send(EnemyDestroyed { reward: 50 });
    assert_eq!(total.load(Ordering::Relaxed), 0);

    bus.drain();
    assert_eq!(total.load(Ordering::Relaxed), 50);
}
