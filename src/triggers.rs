//! Pre-run trigger placement for false starts and mistake discovery.
//!
//! Both behaviors fire only at sentence boundaries so they never interrupt
//! mid-sentence. Offsets are sampled once, before typing starts, and are
//! consumed as the engine's committed-character counter reaches them,
//! whether or not the behavior itself succeeds.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SimConfig;

/// Sources shorter than this never schedule either behavior.
const MIN_SOURCE_CHARS: usize = 200;

/// Char offsets immediately following a terminal punctuation mark plus one
/// whitespace character, across the whole source. This is a coarser pass
/// than the per-block boundary detector and is used only for trigger
/// placement.
pub fn sentence_end_offsets(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut offsets = Vec::new();
    for i in 0..chars.len().saturating_sub(1) {
        if matches!(chars[i], '.' | '!' | '?') && chars[i + 1].is_whitespace() {
            offsets.push(i + 2);
        }
    }
    offsets
}

#[derive(Debug, Clone, Default)]
pub struct TriggerSet {
    false_starts: HashSet<usize>,
    discoveries: HashSet<usize>,
}

impl TriggerSet {
    /// Sample both trigger sets for a run. The discovery set excludes every
    /// chosen false-start offset, so the two never fire at the same place.
    pub fn plan(source: &str, cfg: &SimConfig, rng: &mut impl Rng) -> Self {
        let total_chars = source.chars().count();
        let mut set = TriggerSet::default();
        if total_chars <= MIN_SOURCE_CHARS {
            return set;
        }

        let sentence_ends = sentence_end_offsets(source);

        if cfg.false_starts_enabled && cfg.false_start_count > 0 {
            let eligible: Vec<usize> = sentence_ends
                .iter()
                .copied()
                .filter(|&p| p > 80 && p < total_chars - 60)
                .collect();
            set.false_starts = eligible
                .choose_multiple(rng, cfg.false_start_count.min(eligible.len()))
                .copied()
                .collect();
        }

        if cfg.mistake_discovery_enabled && cfg.edit_frequency > 0 {
            let eligible: Vec<usize> = sentence_ends
                .iter()
                .copied()
                .filter(|&p| p > 80 && p < total_chars - 40 && !set.false_starts.contains(&p))
                .collect();
            set.discoveries = eligible
                .choose_multiple(rng, cfg.edit_frequency.min(eligible.len()))
                .copied()
                .collect();
        }

        set
    }

    /// Consume the false-start trigger at `offset`, if one is pending there.
    pub fn take_false_start(&mut self, offset: usize) -> bool {
        self.false_starts.remove(&offset)
    }

    /// Consume the mistake-discovery trigger at `offset`, if pending.
    pub fn take_discovery(&mut self, offset: usize) -> bool {
        self.discoveries.remove(&offset)
    }

    pub fn pending_false_starts(&self) -> usize {
        self.false_starts.len()
    }

    pub fn pending_discoveries(&self) -> usize {
        self.discoveries.len()
    }

    pub fn false_start_offsets(&self) -> &HashSet<usize> {
        &self.false_starts
    }

    pub fn discovery_offsets(&self) -> &HashSet<usize> {
        &self.discoveries
    }
}
