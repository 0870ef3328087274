use std::sync::Arc;
use std::time::{Duration, Instant};

use ghostwriter::control::RunControl;

#[test]
fn stop_is_latched() {
    let control = RunControl::new();
    assert!(!control.stop_requested());
    control.request_stop();
    assert!(control.stop_requested());
    assert!(control.stop_requested());
}

#[test]
fn interruptible_sleep_returns_early_on_stop() {
    let control = Arc::new(RunControl::new());

    let stopper = {
        let control = control.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            control.request_stop();
        })
    };

    let started = Instant::now();
    control.sleep_interruptible(Duration::from_secs(10));
    let elapsed = started.elapsed();

    stopper.join().unwrap();
    // Bounded by one polling interval after the stop lands.
    assert!(elapsed < Duration::from_millis(500), "took {elapsed:?}");
}

#[test]
fn responsive_sleep_extends_while_paused() {
    let control = Arc::new(RunControl::new());
    control.pause();

    let resumer = {
        let control = control.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            control.resume();
        })
    };

    let started = Instant::now();
    control.sleep_responsive(Duration::from_millis(100));
    let elapsed = started.elapsed();

    resumer.join().unwrap();
    // The 100ms sleep only starts counting once resumed.
    assert!(elapsed >= Duration::from_millis(350), "took {elapsed:?}");
}

#[test]
fn responsive_sleep_aborts_when_stopped_while_paused() {
    let control = Arc::new(RunControl::new());
    control.pause();

    let stopper = {
        let control = control.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            control.request_stop();
        })
    };

    let started = Instant::now();
    control.sleep_responsive(Duration::from_secs(10));
    let elapsed = started.elapsed();

    stopper.join().unwrap();
    assert!(elapsed < Duration::from_millis(500), "took {elapsed:?}");
}

#[test]
fn wait_while_paused_passes_through_when_not_paused() {
    let control = RunControl::new();
    let started = Instant::now();
    control.wait_while_paused();
    assert!(started.elapsed() < Duration::from_millis(50));
}
