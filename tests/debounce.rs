//! Real-time debounce scenarios.
//!
//! The three parametrized cases pin down the races between a second event
//! and the first invocation: arriving during the delay (coalesced),
//! arriving during the callback with the new delay outliving it, and
//! arriving during the callback with the new delay expiring first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::sleep;
use std::time::Duration;

use marginalia::Debouncer;

fn counting(delay_ms: u64, callback_ms: u64) -> (Debouncer, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let completions = Arc::clone(&count);
    let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move || {
        sleep(Duration::from_millis(callback_ms));
        completions.fetch_add(1, Ordering::SeqCst);
    });
    (debouncer, count)
}

#[test]
fn test_single_event_invokes_once_after_delay() {
    let (debouncer, count) = counting(100, 0);
    debouncer.event();
    assert_eq!(count.load(Ordering::SeqCst), 0, "must not fire early");
    sleep(Duration::from_millis(250));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_burst_of_events_collapses_to_one_invocation() {
    let (debouncer, count) = counting(100, 0);
    for _ in 0..10 {
        debouncer.event();
        sleep(Duration::from_millis(10));
    }
    sleep(Duration::from_millis(250));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

fn second_event_scenario(delay_ms: u64, callback_ms: u64, second_at_ms: u64, expected: usize) {
    let (debouncer, count) = counting(delay_ms, callback_ms);
    debouncer.event();
    sleep(Duration::from_millis(second_at_ms));
    debouncer.event();
    sleep(Duration::from_millis(delay_ms + callback_ms + 100));
    assert_eq!(count.load(Ordering::SeqCst), expected);
}

#[test]
fn test_second_event_during_delay() {
    // The pending delay is cancelled and replaced; one invocation total.
    second_event_scenario(200, 100, 100, 1);
}

#[test]
fn test_second_event_during_callback_delay_outlives_it() {
    // The new delay is still pending when the callback finishes; it fires
    // on its own and starts the second invocation.
    second_event_scenario(200, 100, 300, 2);
}

#[test]
fn test_second_event_during_callback_delay_expires_first() {
    // The new delay expires while the callback still runs; the second
    // invocation starts immediately on completion, with no extra delay.
    second_event_scenario(200, 300, 300, 2);
}

#[test]
fn test_event_during_execution_is_never_lost() {
    let (debouncer, count) = counting(50, 150);
    debouncer.event();
    // Land the second event squarely inside the first callback body.
    sleep(Duration::from_millis(120));
    debouncer.event();
    sleep(Duration::from_millis(400));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_callback_does_not_wedge_the_timer() {
    let count = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&count);
    let debouncer = Debouncer::new(Duration::from_millis(50), move || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            panic!("first invocation fails");
        }
    });

    debouncer.event();
    sleep(Duration::from_millis(150));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // The executing flag must have been cleared; later events still fire.
    debouncer.event();
    sleep(Duration::from_millis(150));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_drop_with_pending_delay_does_not_invoke() {
    let (debouncer, count) = counting(100, 0);
    debouncer.event();
    drop(debouncer);
    sleep(Duration::from_millis(200));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
