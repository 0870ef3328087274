use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Per-run simulation parameters.
///
/// A persisted record missing a key falls back to that key's default;
/// out-of-range values are pinned by [`SimConfig::clamped`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target typing speed in words per minute (15-200).
    pub wpm: u32,
    /// Probability, in percent, of injecting a neighbor-key typo per
    /// non-whitespace character (0-20).
    pub error_rate: f64,
    /// Uniform jitter applied to the per-character delay, in percent of the
    /// base delay (0-100).
    pub variability: u32,
    /// Amplitude of the slow momentum/hesitation oscillation, in percent of
    /// the base delay (0-100).
    pub burstiness: u32,
    /// Countdown before the first character is sent (2-15 seconds).
    pub start_delay_secs: u64,
    /// Fixed inter-block pause used when smart pausing is off (2-30 seconds).
    pub block_pause_secs: u64,
    /// Scale inter-block pauses by the next block's length and insert
    /// occasional micro-breaks while typing.
    pub smart_pausing: bool,
    /// Type and then delete short AI-generated fragments at sentence
    /// boundaries. Requires a fragment generator.
    pub false_starts_enabled: bool,
    /// Number of false starts to schedule per run (0-10).
    pub false_start_count: usize,
    /// Go back and rephrase or fix a recently typed word at sentence
    /// boundaries.
    pub mistake_discovery_enabled: bool,
    /// Number of mistake-discovery corrections to schedule per run (0-8).
    pub edit_frequency: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wpm: 65,
            error_rate: 3.0,
            variability: 40,
            burstiness: 50,
            start_delay_secs: 5,
            block_pause_secs: 8,
            smart_pausing: true,
            false_starts_enabled: false,
            false_start_count: 3,
            mistake_discovery_enabled: true,
            edit_frequency: 3,
        }
    }
}

impl SimConfig {
    /// Pin every field to its documented range.
    pub fn clamped(mut self) -> Self {
        self.wpm = self.wpm.clamp(15, 200);
        self.error_rate = self.error_rate.clamp(0.0, 20.0);
        self.variability = self.variability.min(100);
        self.burstiness = self.burstiness.min(100);
        self.start_delay_secs = self.start_delay_secs.clamp(2, 15);
        self.block_pause_secs = self.block_pause_secs.clamp(2, 30);
        self.false_start_count = self.false_start_count.min(10);
        self.edit_frequency = self.edit_frequency.min(8);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!((15..=200).contains(&self.wpm), "wpm must be between 15 and 200");
        ensure!(
            self.error_rate.is_finite() && (0.0..=20.0).contains(&self.error_rate),
            "error_rate must be between 0 and 20 percent"
        );
        ensure!(self.variability <= 100, "variability must be between 0 and 100");
        ensure!(self.burstiness <= 100, "burstiness must be between 0 and 100");
        ensure!(
            (2..=15).contains(&self.start_delay_secs),
            "start_delay_secs must be between 2 and 15"
        );
        ensure!(
            (2..=30).contains(&self.block_pause_secs),
            "block_pause_secs must be between 2 and 30"
        );
        ensure!(
            self.false_start_count <= 10,
            "false_start_count must be between 0 and 10"
        );
        ensure!(self.edit_frequency <= 8, "edit_frequency must be between 0 and 8");
        Ok(())
    }

    /// Parse a persisted JSON record. Missing keys fall back to defaults and
    /// out-of-range values are clamped rather than rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: SimConfig = serde_json::from_str(json)?;
        Ok(cfg.clamped())
    }
}
