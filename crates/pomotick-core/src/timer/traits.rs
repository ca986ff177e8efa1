use serde::{Deserialize, Serialize};

use super::display::DisplayFrame;
use super::mode::{Category, Mode};
use crate::error::ValidationError;

/// The cue played when a countdown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl Default for AlertTone {
    fn default() -> Self {
        Self {
            frequency_hz: 440,
            duration_ms: 500,
        }
    }
}

/// Opaque alert capability. Implementations must not block; nothing is
/// acknowledged back to the engine.
pub trait ExpiryAlert: Send {
    fn play(&mut self, tone: &AlertTone);
}

/// Receives every display-relevant change a session produces.
///
/// Only `on_display` is required; the rest default to no-ops so a plain
/// clock renderer stays small.
pub trait TimerObserver: Send {
    /// Called on every state change with the current clock and run state.
    fn on_display(&mut self, frame: &DisplayFrame);

    /// A new motivational message was selected.
    fn on_message(&mut self, _category: Category, _message: &str) {}

    /// A preset was selected; highlight its selector and animate.
    fn on_mode_changed(&mut self, _mode: Mode) {}

    /// Work/Rest toggle flipped; swap the theme marker.
    fn on_category_changed(&mut self, _category: Category) {}

    /// The default-mode selector now shows a custom duration.
    fn on_custom_label(&mut self, _label: &str) {}

    /// A custom duration was rejected; show `err` to the user.
    fn on_validation_error(&mut self, _err: &ValidationError) {}

    /// Reset finished; replay the change animation.
    fn on_reset(&mut self) {}
}

/// Alert that does nothing, for hosts with alerts disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl ExpiryAlert for SilentAlert {
    fn play(&mut self, _tone: &AlertTone) {}
}
