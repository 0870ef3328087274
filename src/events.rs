//! Run progress events.
//!
//! The engine emits events over a channel so the caller's own thread is
//! never blocked by typing delays. Delivery is best-effort: a caller that
//! stops listening never stalls or fails the run.

use std::sync::mpsc;

use crate::engine::Phase;
use crate::stats::StatsSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The full buffer as sent to the sink so far. Batched at speed.
    TextUpdated(String),
    /// Whole percent of source characters committed.
    ProgressUpdated(u8),
    /// Seconds remaining before typing starts.
    CountdownUpdated(u64),
    StatusMessage(String),
    PhaseChanged(Phase),
    BlockUpdated { current: usize, total: usize },
    StatsUpdated(StatsSnapshot),
    Finished,
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn channel() -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    pub fn text(&self, buffer: &str) {
        self.send(Event::TextUpdated(buffer.to_string()));
    }

    pub fn progress(&self, percent: u8) {
        self.send(Event::ProgressUpdated(percent));
    }

    pub fn countdown(&self, seconds: u64) {
        self.send(Event::CountdownUpdated(seconds));
    }

    pub fn status(&self, message: impl Into<String>) {
        self.send(Event::StatusMessage(message.into()));
    }

    pub fn phase(&self, phase: Phase) {
        self.send(Event::PhaseChanged(phase));
    }

    pub fn block(&self, current: usize, total: usize) {
        self.send(Event::BlockUpdated { current, total });
    }

    pub fn stats(&self, snapshot: StatsSnapshot) {
        self.send(Event::StatsUpdated(snapshot));
    }

    pub fn finished(&self) {
        self.send(Event::Finished);
    }
}
