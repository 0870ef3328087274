//! The simulation engine: a cancellable state machine that walks the source
//! text character by character, drives the input sink, and emits progress
//! events.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::control::RunControl;
use crate::events::{Event, EventSender};
use crate::llm::FragmentGenerator;
use crate::sink::{FailSafeAbort, InputSink};
use crate::timing::TimingModel;
use crate::triggers::TriggerSet;
use crate::{discovery, false_start, keyboard, segment, sentence, stats};

/// Status line variants shown while pausing between blocks.
const THINKING_MESSAGES: &[&str] = &[
    "Thinking...",
    "Collecting thoughts...",
    "Composing...",
    "Considering phrasing...",
    "Reviewing...",
    "Reflecting...",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown,
    Typing,
    Pausing,
    Complete,
    Stopped,
    Error,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Stopped | Phase::Error)
    }

    /// Legal transitions of the run state machine. Anything else is a
    /// programming error, not a runtime possibility.
    pub fn can_transition(self, next: Phase) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (Phase::Idle, Phase::Countdown) => true,
            (Phase::Countdown, Phase::Typing) => true,
            (Phase::Typing, Phase::Pausing) | (Phase::Pausing, Phase::Typing) => true,
            (Phase::Typing, Phase::Complete) => true,
            (from, Phase::Stopped | Phase::Error) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Mutable run-lifetime state. Created fresh per run, engine-owned until the
/// run reaches a terminal phase.
#[derive(Debug)]
struct RunState {
    phase: Phase,
    /// Everything actually sent to the sink so far. Diverges from the source
    /// prefix only transiently, inside an excursion.
    typed: String,
    /// Source characters committed; excludes transient excursion characters.
    chars_typed: usize,
    false_starts: usize,
    corrections: usize,
}

impl RunState {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            typed: String::new(),
            chars_typed: 0,
            false_starts: 0,
            corrections: 0,
        }
    }
}

enum RunOutcome {
    Complete,
    Stopped,
}

pub struct SimulationEngine {
    cfg: SimConfig,
    sink: Box<dyn InputSink + Send>,
    generator: Option<Box<dyn FragmentGenerator + Send>>,
    events: EventSender,
    control: Arc<RunControl>,
    rng: StdRng,
    state: RunState,
}

impl SimulationEngine {
    pub fn new(
        cfg: SimConfig,
        sink: Box<dyn InputSink + Send>,
        generator: Option<Box<dyn FragmentGenerator + Send>>,
        events: EventSender,
        control: Arc<RunControl>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            cfg,
            sink,
            generator,
            events,
            control,
            rng,
            state: RunState::new(),
        }
    }

    fn set_phase(&mut self, next: Phase) {
        if self.state.phase == next {
            return;
        }
        debug_assert!(
            self.state.phase.can_transition(next),
            "illegal phase transition {:?} -> {:?}",
            self.state.phase,
            next
        );
        self.state.phase = next;
        self.events.phase(next);
    }

    /// Run to a terminal phase. Every failure path is mapped here: a sink
    /// fail-safe trip and any unclassified error both terminate the run as
    /// `Error`; a stop request terminates it as `Stopped`.
    pub fn run(mut self, source: &str) -> Phase {
        let final_phase = match self.run_inner(source) {
            Ok(RunOutcome::Complete) => Phase::Complete,
            Ok(RunOutcome::Stopped) => Phase::Stopped,
            Err(err) => {
                if err.downcast_ref::<FailSafeAbort>().is_some() {
                    self.events.status("Fail-safe triggered, stopping");
                } else {
                    self.events.status(format!("Error: {err:#}"));
                }
                Phase::Error
            }
        };
        self.set_phase(final_phase);
        self.events.finished();
        final_phase
    }

    fn run_inner(&mut self, source: &str) -> Result<RunOutcome> {
        let blocks = segment::segment(source);
        let total_blocks = blocks.len();
        let total_chars = source.chars().count();
        let mut triggers = TriggerSet::plan(source, &self.cfg, &mut self.rng);
        let timing = TimingModel::from_config(&self.cfg);

        log::debug!(
            "run start: {total_chars} chars, {total_blocks} blocks, {} false starts, {} edits",
            triggers.pending_false_starts(),
            triggers.pending_discoveries()
        );

        self.set_phase(Phase::Countdown);
        self.events.status("Switch to your target window...");
        for remaining in (1..=self.cfg.start_delay_secs).rev() {
            if self.control.stop_requested() {
                return Ok(RunOutcome::Stopped);
            }
            self.events.countdown(remaining);
            self.control.sleep_interruptible(Duration::from_secs(1));
        }
        if self.control.stop_requested() {
            return Ok(RunOutcome::Stopped);
        }
        self.events.countdown(0);
        self.set_phase(Phase::Typing);

        let started = Instant::now();

        for (bi, block) in blocks.iter().enumerate() {
            if self.control.stop_requested() {
                return Ok(RunOutcome::Stopped);
            }
            self.set_phase(Phase::Typing);
            self.events.block(bi + 1, total_blocks);
            self.events.status(format!("Block {}/{}", bi + 1, total_blocks));

            let block_chars: Vec<char> = block.chars().collect();
            let mut micro_count = 0usize;
            let mut micro_threshold = self.rng.gen_range(60..=100);
            let mut just_ended = false;

            for (ci, &ch) in block_chars.iter().enumerate() {
                self.control.wait_while_paused();
                if self.control.stop_requested() {
                    return Ok(RunOutcome::Stopped);
                }

                let mut delay = timing.delay(self.state.chars_typed, &mut self.rng);

                // Brief hesitation before starting the next sentence.
                if just_ended && !matches!(ch, ' ' | '\n' | '\t') {
                    let pause = Duration::from_secs_f64(self.rng.gen_range(0.2..=0.6));
                    self.control.sleep_responsive(pause);
                    just_ended = false;
                }

                if matches!(ch, '.' | '!' | '?') {
                    delay += timing.terminal_punct_surcharge(&mut self.rng);
                    if sentence::is_sentence_end(&block_chars, ci) {
                        delay += timing.sentence_end_pause(ch, &mut self.rng);
                        just_ended = true;
                    }
                } else if matches!(ch, ',' | ';' | ':') {
                    delay += timing.secondary_punct_surcharge(&mut self.rng);
                }

                if self.cfg.smart_pausing && micro_count >= micro_threshold {
                    let pause = Duration::from_secs_f64(self.rng.gen_range(0.4..=2.0));
                    self.control.sleep_responsive(pause);
                    micro_count = 0;
                    micro_threshold = self.rng.gen_range(60..=100);
                }

                if triggers.take_false_start(self.state.chars_typed) {
                    self.state.false_starts += 1;
                    if self.generator.is_some() {
                        self.set_phase(Phase::Pausing);
                        if let Some(generator) = self.generator.as_mut() {
                            false_start::attempt(
                                self.sink.as_mut(),
                                generator.as_mut(),
                                &mut self.state.typed,
                                &timing,
                                &self.control,
                                &self.events,
                                &mut self.rng,
                            )?;
                        }
                        if self.control.stop_requested() {
                            return Ok(RunOutcome::Stopped);
                        }
                        self.set_phase(Phase::Typing);
                        self.events.status(format!("Block {}/{}", bi + 1, total_blocks));
                    }
                }

                if triggers.take_discovery(self.state.chars_typed) {
                    self.state.corrections += 1;
                    self.set_phase(Phase::Pausing);
                    discovery::attempt(
                        self.sink.as_mut(),
                        &mut self.state.typed,
                        &timing,
                        &self.control,
                        &self.events,
                        &mut self.rng,
                    )?;
                    if self.control.stop_requested() {
                        return Ok(RunOutcome::Stopped);
                    }
                    self.set_phase(Phase::Typing);
                    self.events.status(format!("Block {}/{}", bi + 1, total_blocks));
                }

                if !matches!(ch, ' ' | '\n' | '\t')
                    && self.rng.gen_bool(self.cfg.error_rate / 100.0)
                {
                    self.inject_typo(ch, delay, &timing)?;
                    if self.control.stop_requested() {
                        return Ok(RunOutcome::Stopped);
                    }
                }

                self.sink.insert_char(ch)?;
                self.state.typed.push(ch);
                self.state.chars_typed += 1;
                micro_count += 1;

                // Batch buffer updates at speed; progress goes out per char.
                if self.state.chars_typed % 2 == 0 || self.cfg.wpm < 100 {
                    self.events.text(&self.state.typed);
                }
                let percent = self.state.chars_typed * 100 / total_chars.max(1);
                self.events.progress(percent.min(100) as u8);
                if self.state.chars_typed % 10 == 0 {
                    self.emit_stats(total_chars, bi + 1, total_blocks, started);
                }

                self.control.sleep_responsive(delay);
            }

            if bi + 1 < total_blocks {
                if self.control.stop_requested() {
                    return Ok(RunOutcome::Stopped);
                }
                self.set_phase(Phase::Pausing);
                let pause = self.block_pause(&blocks[bi + 1]);
                let musing = THINKING_MESSAGES[self.rng.gen_range(0..THINKING_MESSAGES.len())];
                self.events.status(format!(
                    "Block {}/{} done, {}",
                    bi + 1,
                    total_blocks,
                    musing
                ));
                self.control.sleep_responsive(pause);
            }
        }

        if self.control.stop_requested() {
            return Ok(RunOutcome::Stopped);
        }

        self.events.text(&self.state.typed);
        self.events.progress(100);
        self.emit_stats(total_chars, total_blocks, total_blocks, started);
        Ok(RunOutcome::Complete)
    }

    /// Type a neighbor-key slip and immediately backspace it before the
    /// intended character goes out.
    fn inject_typo(&mut self, intended: char, delay: Duration, timing: &TimingModel) -> Result<()> {
        let typo = keyboard::neighbor_typo_char(intended, &mut self.rng);
        let base = timing.base_char_delay();

        self.sink.insert_char(typo)?;
        self.state.typed.push(typo);
        self.events.text(&self.state.typed);

        let recognition = delay.mul_f64(0.4)
            + base.mul_f64(2.0)
            + Duration::from_secs_f64(self.rng.gen::<f64>() * 0.1);
        self.control.sleep_responsive(recognition);
        if self.control.stop_requested() {
            return Ok(());
        }

        self.sink.press_key(crate::sink::Key::Backspace)?;
        self.state.typed.pop();
        self.events.text(&self.state.typed);
        self.control.sleep_responsive(base);
        Ok(())
    }

    /// Pause between blocks: sized by the next block when smart pausing is
    /// on, the configured fixed pause otherwise, both with 30% jitter.
    fn block_pause(&mut self, next_block: &str) -> Duration {
        let base = if self.cfg.smart_pausing {
            let n = next_block.trim().chars().count();
            if n < 100 {
                self.rng.gen_range(3.0..=6.0)
            } else if n <= 300 {
                self.rng.gen_range(6.0..=12.0)
            } else {
                self.rng.gen_range(12.0..=25.0)
            }
        } else {
            self.cfg.block_pause_secs as f64
        };
        let jitter = self.rng.gen_range(-base * 0.3..=base * 0.3);
        Duration::from_secs_f64((base + jitter).max(0.0))
    }

    fn emit_stats(
        &mut self,
        total_chars: usize,
        blocks_done: usize,
        total_blocks: usize,
        started: Instant,
    ) {
        self.events.stats(stats::snapshot(
            self.state.chars_typed,
            total_chars,
            blocks_done,
            total_blocks,
            self.state.false_starts,
            self.state.corrections,
            started.elapsed(),
        ));
    }
}

/// Handle to a running simulation thread.
pub struct RunHandle {
    control: Arc<RunControl>,
    join: thread::JoinHandle<Phase>,
}

impl RunHandle {
    pub fn control(&self) -> Arc<RunControl> {
        self.control.clone()
    }

    pub fn stop(&self) {
        self.control.request_stop();
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Block until the run reaches its terminal phase.
    pub fn wait(self) -> Phase {
        self.join.join().unwrap_or(Phase::Error)
    }
}

/// Spawn a simulation on its own thread so the caller stays responsive.
/// Exactly one run owns the sink and state for its whole lifetime.
pub fn spawn(
    source: String,
    cfg: SimConfig,
    sink: Box<dyn InputSink + Send>,
    generator: Option<Box<dyn FragmentGenerator + Send>>,
    seed: Option<u64>,
) -> Result<(RunHandle, mpsc::Receiver<Event>)> {
    let (events, receiver) = EventSender::channel();
    let control = Arc::new(RunControl::new());
    let engine = SimulationEngine::new(cfg, sink, generator, events, control.clone(), seed);

    let join = thread::Builder::new()
        .name("ghostwriter-sim".to_string())
        .spawn(move || engine.run(&source))
        .context("failed to spawn simulation thread")?;

    Ok((RunHandle { control, join }, receiver))
}
