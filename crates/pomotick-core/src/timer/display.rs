//! Clock formatting and the frame handed to display observers.

use serde::{Deserialize, Serialize};

use super::mode::Category;

/// Window/tab title shown whenever the countdown is not running.
pub const DEFAULT_TITLE: &str = "Pomodoro Timer";

/// Format seconds as zero-padded `MM:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything a display needs to redraw after a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    /// Two-digit zero-padded minutes.
    pub minutes: String,
    /// Two-digit zero-padded seconds.
    pub seconds: String,
    pub running: bool,
    pub category: Category,
}

impl DisplayFrame {
    pub fn new(remaining_secs: u32, running: bool, category: Category) -> Self {
        Self {
            minutes: format!("{:02}", remaining_secs / 60),
            seconds: format!("{:02}", remaining_secs % 60),
            running,
            category,
        }
    }

    pub fn clock(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }

    /// `"MM:SS - Work Mode"` while running, otherwise `default_title`.
    pub fn title(&self, default_title: &str) -> String {
        if self.running {
            format!("{} - {} Mode", self.clock(), self.category)
        } else {
            default_title.to_string()
        }
    }
}
