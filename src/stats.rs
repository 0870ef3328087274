//! Live throughput and ETA snapshots.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    pub actual_wpm: u64,
    pub chars_typed: usize,
    pub total_chars: usize,
    pub blocks_done: usize,
    pub total_blocks: usize,
    pub eta_seconds: u64,
    pub false_starts: usize,
    pub corrections: usize,
}

/// Derive a snapshot from the run's progress counters and elapsed time.
/// WPM uses the five-characters-per-word convention; ETA is zero until a
/// meaningful rate exists.
pub fn snapshot(
    chars_typed: usize,
    total_chars: usize,
    blocks_done: usize,
    total_blocks: usize,
    false_starts: usize,
    corrections: usize,
    elapsed: Duration,
) -> StatsSnapshot {
    let elapsed_secs = elapsed.as_secs_f64();
    let wpm = if elapsed_secs > 0.0 && chars_typed > 0 {
        (chars_typed as f64 / 5.0) / (elapsed_secs / 60.0)
    } else {
        0.0
    };
    let eta = if wpm > 0.0 {
        ((total_chars.saturating_sub(chars_typed)) as f64 / 5.0) / (wpm / 60.0)
    } else {
        0.0
    };

    StatsSnapshot {
        actual_wpm: wpm.round() as u64,
        chars_typed,
        total_chars,
        blocks_done,
        total_blocks,
        eta_seconds: eta.round() as u64,
        false_starts,
        corrections,
    }
}
