//! Timer engine implementation.
//!
//! The timer engine is a tick-driven countdown state machine. It owns no
//! timers of its own - the caller delivers one `tick()` per elapsed second
//! while the engine is running (see [`TickSubscription`](super::TickSubscription)).
//!
//! ## State Transitions
//!
//! ```text
//! Stopped(mode, r) --start--> Running(mode, r)
//! Running(mode, r) --pause--> Stopped(mode, r)
//! Running(mode, r>0) --tick--> Running(mode, r-1)
//! Running(mode, 0)   --tick--> Stopped(mode, 0) + TimerExpired
//! any --set_mode(p)--> Stopped(p, default(p))
//! any --reset--> Stopped(Pomodoro, 1500)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { host.dispatch(event); }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::display::{format_clock, DisplayFrame};
use super::mode::{Category, CustomDuration, Mode, Preset, MAX_DURATION_SECS};
use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
}

/// Core timer engine.
///
/// Commands return the events they produced, in order. An empty vector
/// means the command was a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: Mode,
    remaining_secs: u32,
    running: bool,
}

impl TimerEngine {
    /// Create an engine in `Stopped(Pomodoro, 1500)`.
    pub fn new() -> Self {
        Self::with_mode(Mode::Pomodoro)
    }

    /// Create a stopped engine loaded with `mode`'s duration. Custom
    /// durations above one hour are capped.
    pub fn with_mode(mode: Mode) -> Self {
        let mode = match mode {
            Mode::Custom { secs, category } => Mode::Custom {
                secs: secs.min(MAX_DURATION_SECS),
                category,
            },
            preset => preset,
        };
        Self {
            mode,
            remaining_secs: mode.duration_secs(),
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else {
            TimerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn category(&self) -> Category {
        self.mode.category()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame::new(self.remaining_secs, self.running, self.category())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            mode: self.mode,
            category: self.category(),
            remaining_secs: self.remaining_secs,
            clock: format_clock(self.remaining_secs),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.running {
            return Vec::new();
        }
        self.running = true;
        debug!(mode = self.mode.label(), remaining = self.remaining_secs, "timer started");
        vec![
            Event::TimerStarted {
                mode: self.mode,
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
            self.display_event(),
        ]
    }

    /// Stop the countdown. Safe to call when already stopped; the events are
    /// still emitted so the host resets its title.
    pub fn pause(&mut self) -> Vec<Event> {
        if self.running {
            debug!(remaining = self.remaining_secs, "timer paused");
        }
        self.running = false;
        vec![
            Event::TimerPaused {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
            self.display_event(),
        ]
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let mut events = self.pause();
        events.extend(self.set_mode(Preset::Pomodoro));
        events.push(Event::TimerReset { at: Utc::now() });
        events
    }

    pub fn set_mode(&mut self, preset: Preset) -> Vec<Event> {
        let mut events = self.pause();
        self.mode = Mode::from(preset);
        self.remaining_secs = preset.duration_secs();
        debug!(mode = self.mode.label(), "mode selected");
        events.push(Event::ModeChanged {
            mode: self.mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        });
        events.push(self.display_event());
        events
    }

    /// Work/Rest toggle. Loads the category's preset duration but leaves the
    /// run state alone.
    pub fn set_category(&mut self, category: Category) -> Vec<Event> {
        let preset = category.preset();
        self.mode = Mode::from(preset);
        self.remaining_secs = preset.duration_secs();
        debug!(category = category.as_str(), running = self.running, "category selected");
        vec![
            Event::CategoryChanged {
                category,
                at: Utc::now(),
            },
            self.display_event(),
        ]
    }

    /// Replace the countdown with a user-entered duration.
    ///
    /// On error the engine is left untouched.
    pub fn set_custom_duration(
        &mut self,
        minutes: u32,
        seconds: u32,
    ) -> Result<Vec<Event>, ValidationError> {
        let duration = CustomDuration::new(minutes, seconds).inspect_err(|err| {
            warn!(minutes, seconds, "rejected custom duration: {err}");
        })?;
        self.apply_custom(duration);
        Ok(vec![
            Event::CustomDurationApplied {
                minutes: duration.minutes(),
                seconds: duration.seconds(),
                label: format_clock(duration.total_secs()),
                at: Utc::now(),
            },
            self.display_event(),
        ])
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero stops the engine and emits exactly one `TimerExpired`
    /// in the same call; later ticks are ignored until `start()`.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            // expire() pauses, so the only zero frame is a stopped one.
            return self.expire();
        }
        vec![self.display_event()]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_custom(&mut self, duration: CustomDuration) {
        let secs = duration.total_secs();
        self.mode = Mode::Custom {
            secs,
            category: self.category(),
        };
        self.remaining_secs = secs;
        debug!(secs, running = self.running, "custom duration applied");
    }

    fn expire(&mut self) -> Vec<Event> {
        let mut events = self.pause();
        info!(mode = self.mode.label(), "timer expired");
        events.push(Event::TimerExpired {
            mode: self.mode,
            at: Utc::now(),
        });
        events
    }

    fn display_event(&self) -> Event {
        Event::DisplayUpdated {
            frame: self.frame(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
