//! The mistake-discovery excursion: notice a recently typed word, navigate
//! back, replace it, and return to the live typing position.

use std::time::Duration;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::control::RunControl;
use crate::events::EventSender;
use crate::sink::{InputSink, Key};
use crate::timing::TimingModel;

/// Stylistic synonym swaps and common-typo corrections, tried in shuffled
/// order. The first pair whose old word appears in the search region wins.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("very", "quite"),
    ("good", "solid"),
    ("bad", "poor"),
    ("big", "large"),
    ("small", "minor"),
    ("nice", "pleasant"),
    ("hard", "difficult"),
    ("easy", "simple"),
    ("fast", "quick"),
    ("show", "demonstrate"),
    ("help", "assist"),
    ("use", "utilize"),
    ("get", "obtain"),
    ("make", "create"),
    ("think", "believe"),
    ("want", "desire"),
    ("need", "require"),
    ("try", "attempt"),
    ("start", "begin"),
    ("also", "additionally"),
    ("but", "however"),
    ("so", "therefore"),
    ("just", "simply"),
    ("really", "truly"),
    ("thing", "aspect"),
    ("stuff", "material"),
    ("kind", "type"),
    ("like", "such as"),
    ("important", "essential"),
    ("different", "distinct"),
    ("probelm", "problem"),
    ("teh", "the"),
    ("wiht", "with"),
    ("becuase", "because"),
    ("recieve", "receive"),
    ("acheive", "achieve"),
    ("occured", "occurred"),
    ("seperate", "separate"),
];

/// Only the trailing portion of the buffer is searched, so cursor travel
/// stays plausible.
const LOOKBACK_CHARS: usize = 500;

/// Regions shorter than this are not worth a correction.
const MIN_REGION_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableWord {
    /// Characters from the start of the matched word to the end of the
    /// buffer at the time of the match.
    pub distance: usize,
    /// The matched text as it appears in the buffer.
    pub found: String,
    /// Replacement with the match's leading capitalization preserved.
    pub replacement: String,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Start offsets of whole-word, case-insensitive occurrences of `word` in
/// `region`.
fn whole_word_matches(region: &[char], word: &str) -> Vec<usize> {
    let needle: Vec<char> = word.chars().collect();
    if needle.is_empty() || needle.len() > region.len() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for start in 0..=region.len() - needle.len() {
        let end = start + needle.len();
        let equal = region[start..end]
            .iter()
            .zip(&needle)
            .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if !equal {
            continue;
        }
        let boundary_before = start == 0 || !is_word_char(region[start - 1]);
        let boundary_after = end == region.len() || !is_word_char(region[end]);
        if boundary_before && boundary_after {
            matches.push(start);
        }
    }
    matches
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Search the trailing part of the buffer for a word from the replacement
/// table. Pairs are shuffled and one occurrence is picked at random, so
/// repeated runs do not always fix the same word.
pub fn find_editable_word(typed: &str, rng: &mut impl Rng) -> Option<EditableWord> {
    let chars: Vec<char> = typed.chars().collect();
    let region_start = chars.len().saturating_sub(LOOKBACK_CHARS);
    let region = &chars[region_start..];
    if region.len() < MIN_REGION_CHARS {
        return None;
    }

    let mut pairs: Vec<&(&str, &str)> = REPLACEMENTS.iter().collect();
    pairs.shuffle(rng);

    for (old, new) in pairs {
        let matches = whole_word_matches(region, old);
        let Some(&start) = matches.choose(rng) else {
            continue;
        };

        let found: String = region[start..start + old.chars().count()].iter().collect();
        let replacement = if found.chars().next().is_some_and(|c| c.is_uppercase()) {
            capitalize_first(new)
        } else {
            (*new).to_string()
        };

        return Some(EditableWord {
            distance: chars.len() - (region_start + start),
            found,
            replacement,
        });
    }

    None
}

/// Navigate back to a recently typed word, replace it, and restore the
/// cursor to the end of the document. No eligible word is a no-op; the
/// trigger is consumed either way. A stop aborts immediately, leaving the
/// sink cursor wherever it was.
pub fn attempt(
    sink: &mut dyn InputSink,
    typed: &mut String,
    timing: &TimingModel,
    control: &RunControl,
    events: &EventSender,
    rng: &mut impl Rng,
) -> Result<()> {
    let Some(edit) = find_editable_word(typed, rng) else {
        return Ok(());
    };
    if control.stop_requested() {
        return Ok(());
    }

    events.status("Fixing mistake...");
    control.sleep_responsive(Duration::from_secs_f64(rng.gen_range(1.0..=2.5)));
    if control.stop_requested() {
        return Ok(());
    }

    let base = timing.base_char_delay();

    for _ in 0..edit.distance {
        if control.stop_requested() {
            return Ok(());
        }
        sink.press_key(Key::Left)?;
        control.sleep_responsive(base.mul_f64(rng.gen_range(0.15..=0.35)));
    }

    let found_len = edit.found.chars().count();
    for _ in 0..found_len {
        if control.stop_requested() {
            return Ok(());
        }
        sink.key_combo(&[Key::Shift, Key::Right])?;
        control.sleep_responsive(base.mul_f64(rng.gen_range(0.15..=0.35)));
    }

    sink.press_key(Key::Delete)?;
    control.sleep_responsive(base.mul_f64(rng.gen_range(0.5..=1.0)));

    for c in edit.replacement.chars() {
        if control.stop_requested() {
            return Ok(());
        }
        sink.insert_char(c)?;
        let delay = timing.delay(0, rng).mul_f64(rng.gen_range(0.8..=1.2));
        control.sleep_responsive(delay);
    }

    // Mirror the edit into the logical buffer.
    let chars: Vec<char> = typed.chars().collect();
    let start = chars.len() - edit.distance;
    let mut updated: String = chars[..start].iter().collect();
    updated.push_str(&edit.replacement);
    updated.extend(&chars[start + found_len..]);
    *typed = updated;
    events.text(typed);

    control.sleep_responsive(base.mul_f64(rng.gen_range(0.3..=0.6)));

    sink.press_key(Key::End)?;
    sink.key_combo(&[Key::Ctrl, Key::End])?;
    control.sleep_responsive(Duration::from_secs_f64(rng.gen_range(0.3..=0.7)));

    Ok(())
}
