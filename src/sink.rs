//! The boundary to the keystroke injection layer.
//!
//! The engine never synthesizes key events itself; it drives whatever
//! `InputSink` it is given. Real sinks inject into the externally focused
//! target. [`BufferSink`] is the in-memory reference sink used by the CLI
//! dry-run and by tests.

use std::fmt;

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Shift,
    Ctrl,
}

/// Raised by a sink when its safety condition trips (for example the
/// pointer entering a screen corner). The engine converts it into a
/// terminal `Error` phase without retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailSafeAbort;

impl fmt::Display for FailSafeAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input sink fail-safe tripped")
    }
}

impl std::error::Error for FailSafeAbort {}

/// Destination for simulated keystrokes. Acts on whatever target currently
/// has external focus.
pub trait InputSink {
    fn insert_char(&mut self, c: char) -> Result<()>;
    fn press_key(&mut self, key: Key) -> Result<()>;
    fn key_combo(&mut self, keys: &[Key]) -> Result<()>;
}

/// In-memory editor model: buffer, cursor, and a selection anchor.
///
/// Supports exactly the editing vocabulary the engine uses. Unknown key
/// combos are an error rather than a silent no-op.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    buf: Vec<char>,
    cursor: usize,
    anchor: Option<usize>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.buf.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        self.buf.drain(start..end);
        self.cursor = start;
        self.anchor = None;
        true
    }
}

impl InputSink for BufferSink {
    fn insert_char(&mut self, c: char) -> Result<()> {
        self.delete_selection();
        self.buf.insert(self.cursor, c);
        self.cursor += 1;
        Ok(())
    }

    fn press_key(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Backspace => {
                if !self.delete_selection() && self.cursor > 0 {
                    self.cursor -= 1;
                    self.buf.remove(self.cursor);
                }
            }
            Key::Delete => {
                if !self.delete_selection() && self.cursor < self.buf.len() {
                    self.buf.remove(self.cursor);
                }
            }
            Key::Left => {
                self.anchor = None;
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            Key::Right => {
                self.anchor = None;
                if self.cursor < self.buf.len() {
                    self.cursor += 1;
                }
            }
            Key::Home => {
                self.anchor = None;
                self.cursor = 0;
            }
            Key::End => {
                self.anchor = None;
                self.cursor = self.buf.len();
            }
            // Bare modifiers do not edit anything.
            Key::Shift | Key::Ctrl => {}
        }
        Ok(())
    }

    fn key_combo(&mut self, keys: &[Key]) -> Result<()> {
        match keys {
            [Key::Shift, Key::Right] => {
                if self.anchor.is_none() {
                    self.anchor = Some(self.cursor);
                }
                if self.cursor < self.buf.len() {
                    self.cursor += 1;
                }
                Ok(())
            }
            [Key::Shift, Key::Left] => {
                if self.anchor.is_none() {
                    self.anchor = Some(self.cursor);
                }
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                Ok(())
            }
            [Key::Ctrl, Key::End] => {
                self.anchor = None;
                self.cursor = self.buf.len();
                Ok(())
            }
            [Key::Ctrl, Key::Home] => {
                self.anchor = None;
                self.cursor = 0;
                Ok(())
            }
            other => Err(anyhow!("BufferSink does not support key combo {other:?}")),
        }
    }
}
