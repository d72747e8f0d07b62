//! Integration tests for the fixed-delay scheduler

use fanout::FixedDelayScheduler;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Stopping before the first fire means the callback never runs
#[test]
fn test_stop_before_first_fire() {
    let fired = Arc::new(AtomicBool::new(false));
    let fired_in_callback = fired.clone();

    let scheduler = FixedDelayScheduler::start(Duration::from_millis(300), move || {
        fired_in_callback.store(true, Ordering::SeqCst);
    })
    .unwrap();

    // Many concurrent stops are harmless
    let stoppers: Vec<_> = (0..10)
        .map(|_| {
            let scheduler = scheduler.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                scheduler.stop();
            })
        })
        .collect();
    for stopper in stoppers {
        stopper.join().unwrap();
    }

    thread::sleep(Duration::from_millis(500));
    assert!(scheduler.is_stopped());
    assert!(!fired.load(Ordering::SeqCst));
}

/// The callback can stop its own scheduler; no run follows
#[test]
fn test_stop_from_inside_callback() {
    let counter = Arc::new(AtomicUsize::new(0));
    let handle: Arc<OnceLock<FixedDelayScheduler>> = Arc::new(OnceLock::new());

    let scheduler = {
        let counter = counter.clone();
        let handle = handle.clone();
        FixedDelayScheduler::start(Duration::from_millis(20), move || {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == 5
                && let Some(scheduler) = handle.get()
            {
                scheduler.stop();
            }
        })
        .unwrap()
    };
    handle.set(scheduler).unwrap();

    thread::sleep(Duration::from_millis(500));
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

/// The delay is measured from the end of one run to the start of the next
#[test]
fn test_delay_counts_from_completion() {
    let delay = Duration::from_millis(40);
    let work = Duration::from_millis(40);
    let starts = Arc::new(Mutex::new(Vec::new()));

    let scheduler = {
        let starts = starts.clone();
        FixedDelayScheduler::start(delay, move || {
            starts.lock().unwrap().push(Instant::now());
            thread::sleep(work);
        })
        .unwrap()
    };

    thread::sleep(Duration::from_millis(450));
    scheduler.stop();
    // Let a callback that was in flight finish
    thread::sleep(Duration::from_millis(100));

    let starts = starts.lock().unwrap();
    assert!(starts.len() >= 2, "expected at least two runs, got {}", starts.len());
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= delay + work);
    }
}

/// A running callback is not interrupted by stop, and nothing runs afterwards
#[test]
fn test_stop_waits_for_running_callback() {
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));

    let scheduler = {
        let started = started.clone();
        let finished = finished.clone();
        FixedDelayScheduler::start(Duration::from_millis(10), move || {
            started.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(100));
            finished.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap()
    };

    // Land inside the first callback
    thread::sleep(Duration::from_millis(50));
    scheduler.stop();

    thread::sleep(Duration::from_millis(250));
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

/// Dropping every handle ends the loop
#[test]
fn test_drop_ends_loop() {
    let counter = Arc::new(AtomicUsize::new(0));
    let in_callback = counter.clone();

    let scheduler = FixedDelayScheduler::start(Duration::from_millis(20), move || {
        in_callback.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    drop(scheduler);

    thread::sleep(Duration::from_millis(150));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

/// Once stop returns and any in-flight run settles, the count never moves again
#[test]
fn test_no_run_starts_after_stop() {
    for _ in 0..50 {
        let counter = Arc::new(AtomicUsize::new(0));
        let in_callback = counter.clone();

        let scheduler = FixedDelayScheduler::start(Duration::from_micros(1), move || {
            in_callback.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(2));
        scheduler.stop();

        // At most one run that already passed its stop check may still land
        thread::sleep(Duration::from_millis(10));
        let settled = counter.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(counter.load(Ordering::SeqCst), settled);
    }
}
