use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Category, DisplayFrame, Mode, TimerState};

/// Every state change in the engine produces an Event.
/// Hosts route them to the display observer and the alert capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Timer returned to the default preset; hosts replay their change animation.
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A preset was selected from the mode selector.
    ModeChanged {
        mode: Mode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Work/Rest toggle flipped; hosts swap theme and message pool.
    CategoryChanged {
        category: Category,
        at: DateTime<Utc>,
    },
    /// A validated custom duration replaced the countdown.
    CustomDurationApplied {
        minutes: u32,
        seconds: u32,
        /// New label for the default-mode selector (`MM:SS`).
        label: String,
        at: DateTime<Utc>,
    },
    /// Remaining time or run state changed.
    DisplayUpdated {
        frame: DisplayFrame,
    },
    /// Countdown reached zero. Hosts play the alert exactly once per event.
    TimerExpired {
        mode: Mode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: Mode,
        category: Category,
        remaining_secs: u32,
        clock: String,
        at: DateTime<Utc>,
    },
}
