//! Search debouncer.
//!
//! Keystrokes update the raw input immediately, but the term used to key
//! fetches only changes after a quiescence window with no further input.
//! This bounds request volume to about one per pause in typing.

use std::time::{Duration, Instant};

/// Default quiescence window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Whether the debouncer is waiting for input to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Input arrived and the quiescence timer is running.
    Pending,
    /// The timer elapsed; the settled term reflects the last input.
    Settled,
}

/// Two-state debouncer over a search box.
///
/// Time is passed in explicitly so callers (and tests) control the clock.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    raw: String,
    settled: String,
    deadline: Option<Instant>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            raw: String::new(),
            settled: String::new(),
            deadline: None,
        }
    }

    /// Records a keystroke: replaces the raw input and restarts the timer.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.raw = text.into();
        self.deadline = Some(now + self.window);
    }

    /// Settles if the quiescence window has passed.
    ///
    /// Returns the newly settled term exactly once per transition into
    /// [`DebounceState::Settled`], even when it equals the previous term.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        match self.deadline {
            Some(deadline) if now >= deadline => Some(self.settle()),
            _ => None,
        }
    }

    /// Settles immediately if input is pending.
    pub fn flush(&mut self) -> Option<&str> {
        if self.deadline.is_some() {
            Some(self.settle())
        } else {
            None
        }
    }

    fn settle(&mut self) -> &str {
        self.deadline = None;
        self.settled.clone_from(&self.raw);
        &self.settled
    }

    /// Returns the current state.
    pub fn state(&self) -> DebounceState {
        if self.deadline.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Settled
        }
    }

    /// Returns when a pending input will settle.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the text as last typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the term fetches are keyed by.
    pub fn settled(&self) -> &str {
        &self.settled
    }

    /// Returns the quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
