//! The false-start excursion: type a generated fragment, reconsider, and
//! delete it again.

use anyhow::Result;
use rand::Rng;

use crate::control::RunControl;
use crate::events::EventSender;
use crate::llm::{request_fragment, FragmentGenerator};
use crate::sink::{InputSink, Key};
use crate::timing::TimingModel;

/// Buffers longer than this contribute only a trailing excerpt as context.
const CONTEXT_THRESHOLD: usize = 150;

fn context_excerpt(typed: &str, rng: &mut impl Rng) -> String {
    let chars: Vec<char> = typed.chars().collect();
    if chars.len() <= CONTEXT_THRESHOLD {
        return typed.to_string();
    }
    let take = rng.gen_range(150..=250).min(chars.len());
    chars[chars.len() - take..].iter().collect()
}

/// Request a fragment and, if one arrives, type it into the sink and then
/// backspace it away. The buffer is restored to its pre-call content unless
/// a stop interrupts mid-excursion, in which case it is left as-is.
///
/// No fragment is never an error: the trigger is consumed either way.
pub fn attempt(
    sink: &mut dyn InputSink,
    generator: &mut dyn FragmentGenerator,
    typed: &mut String,
    timing: &TimingModel,
    control: &RunControl,
    events: &EventSender,
    rng: &mut impl Rng,
) -> Result<()> {
    let context = context_excerpt(typed, rng);
    let Some(fragment) = request_fragment(generator, &context) else {
        return Ok(());
    };
    if control.stop_requested() {
        return Ok(());
    }

    events.status("Reconsidering...");

    for c in fragment.chars() {
        if control.stop_requested() {
            return Ok(());
        }
        sink.insert_char(c)?;
        typed.push(c);
        events.text(typed);
        let delay = timing.delay(0, rng).mul_f64(rng.gen_range(0.8..=1.2));
        control.sleep_responsive(delay);
    }

    control.sleep_responsive(std::time::Duration::from_secs_f64(rng.gen_range(0.7..=2.0)));

    for _ in 0..fragment.chars().count() {
        if control.stop_requested() {
            return Ok(());
        }
        sink.press_key(Key::Backspace)?;
        typed.pop();
        events.text(typed);
        let delay = timing.base_char_delay().mul_f64(rng.gen_range(0.3..=0.7));
        control.sleep_responsive(delay);
    }

    control.sleep_responsive(std::time::Duration::from_secs_f64(rng.gen_range(0.5..=1.2)));
    Ok(())
}
