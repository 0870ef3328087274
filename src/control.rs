use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Upper bound on how long the engine sleeps between stop/pause checks.
/// Keeps worst-case stop latency in the 0.2-0.3s range.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared control surface for one simulation run: a latched stop signal and
/// a pause gate.
///
/// Stop is terminal; once requested the engine reaches a terminal phase
/// within one polling interval. Pause holds the engine without advancing any
/// counters, and deadline-based sleeps extend themselves instead of lapsing.
#[derive(Debug, Default)]
pub struct RunControl {
    stop: AtomicBool,
    paused: Mutex<bool>,
    resumed: Condvar,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake anyone parked on the pause gate so they can observe the stop.
        self.resumed.notify_all();
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        *self.paused.lock().unwrap() = true;
    }

    pub fn resume(&self) {
        *self.paused.lock().unwrap() = false;
        self.resumed.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap()
    }

    /// Block while the pause gate is closed. Returns promptly once resumed
    /// or once a stop is requested.
    pub fn wait_while_paused(&self) {
        let mut paused = self.paused.lock().unwrap();
        while *paused && !self.stop_requested() {
            let (guard, _) = self.resumed.wait_timeout(paused, POLL_INTERVAL).unwrap();
            paused = guard;
        }
    }

    /// Sleep that returns early on stop but ignores the pause gate.
    /// Used for countdown ticks.
    pub fn sleep_interruptible(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            if self.stop_requested() {
                return;
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()).filter(|d| !d.is_zero())
            else {
                return;
            };
            std::thread::sleep(remaining.min(POLL_INTERVAL));
        }
    }

    /// Sleep that returns early on stop and extends its deadline while
    /// paused: time spent behind the pause gate does not count against the
    /// requested duration.
    pub fn sleep_responsive(&self, duration: Duration) {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.stop_requested() {
                return;
            }
            if self.is_paused() {
                self.wait_while_paused();
                continue;
            }
            let step = remaining.min(POLL_INTERVAL);
            std::thread::sleep(step);
            remaining = remaining.saturating_sub(step);
        }
    }
}
