//! Stochastic per-character timing model.
//!
//! Delays combine a base rate derived from the configured WPM, uniform
//! jitter, and a slow sinusoidal burst term that models momentum and
//! hesitation cycles (period of roughly 31 characters).

use std::time::Duration;

use rand::Rng;

use crate::config::SimConfig;

/// Hard floor on any per-character delay. Guarantees forward progress even
/// at extreme negative jitter.
const MIN_CHAR_DELAY_SECS: f64 = 0.005;

#[derive(Debug, Clone, Copy)]
pub struct TimingModel {
    base: f64,
    variability: f64,
    burstiness: f64,
}

impl TimingModel {
    pub fn new(wpm: u32, variability: u32, burstiness: u32) -> Self {
        Self {
            // Five characters per word.
            base: 60.0 / (wpm as f64 * 5.0),
            variability: variability as f64 / 100.0,
            burstiness: burstiness as f64 / 100.0,
        }
    }

    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(cfg.wpm, cfg.variability, cfg.burstiness)
    }

    /// Undecorated per-character base delay.
    pub fn base_char_delay(&self) -> Duration {
        Duration::from_secs_f64(self.base)
    }

    pub fn base_secs(&self) -> f64 {
        self.base
    }

    /// Delay before committing the character at `index`.
    pub fn delay(&self, index: usize, rng: &mut impl Rng) -> Duration {
        let jitter = (rng.gen::<f64>() - 0.5) * 2.0 * self.variability * self.base;
        let burst = (index as f64 / 5.0).sin() * self.burstiness * self.base;
        Duration::from_secs_f64((self.base + jitter + burst).max(MIN_CHAR_DELAY_SECS))
    }

    /// Extra delay added on any terminal punctuation mark (`.!?`).
    pub fn terminal_punct_surcharge(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_secs_f64(self.base * 6.0 + rng.gen::<f64>() * self.base * 2.0)
    }

    /// Additional pause when the mark genuinely ends a sentence.
    pub fn sentence_end_pause(&self, mark: char, rng: &mut impl Rng) -> Duration {
        let secs = match mark {
            '?' => rng.gen_range(0.8..=1.5),
            '!' => rng.gen_range(0.6..=1.3),
            _ => rng.gen_range(0.5..=1.0),
        };
        Duration::from_secs_f64(secs)
    }

    /// Extra delay added on secondary punctuation (`,;:`).
    pub fn secondary_punct_surcharge(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_secs_f64(self.base * 3.0 + rng.gen::<f64>() * self.base)
    }
}
