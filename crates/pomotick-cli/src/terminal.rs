//! Terminal renderings of the session's observer and alert.

use std::io::{IsTerminal, Write};

use pomotick_core::timer::{AlertTone, Category, DisplayFrame, ExpiryAlert, Mode, TimerObserver};
use pomotick_core::ValidationError;
use tracing::debug;

/// Writes the clock line to stdout and everything else to stderr.
///
/// On a TTY the clock redraws in place; otherwise every frame is its own
/// line so output stays scriptable.
pub struct TerminalDisplay {
    default_title: String,
    inline: bool,
    last_line: Option<String>,
}

impl TerminalDisplay {
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            inline: std::io::stdout().is_terminal(),
            last_line: None,
        }
    }

    fn render(frame: &DisplayFrame, default_title: &str) -> String {
        let state = if frame.running { "running" } else { "stopped" };
        format!(
            "{} [{}] {} | {}",
            frame.clock(),
            frame.category.theme_class(),
            state,
            frame.title(default_title)
        )
    }

    fn note(&mut self, text: &str) {
        if self.inline && self.last_line.is_some() {
            println!();
            self.last_line = None;
        }
        eprintln!("{text}");
    }
}

impl TimerObserver for TerminalDisplay {
    fn on_display(&mut self, frame: &DisplayFrame) {
        let line = Self::render(frame, &self.default_title);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let written = if self.inline {
            write!(stdout, "\r\x1b[2K{line}")
        } else {
            writeln!(stdout, "{line}")
        };
        if let Err(err) = written.and_then(|_| stdout.flush()) {
            debug!("failed to draw clock: {err}");
        }
        self.last_line = Some(line);
    }

    fn on_message(&mut self, category: Category, message: &str) {
        self.note(&format!("[{category}] {message}"));
    }

    fn on_mode_changed(&mut self, mode: Mode) {
        self.note(&format!("mode: {}", mode.label()));
    }

    fn on_category_changed(&mut self, category: Category) {
        self.note(&format!("{category} mode"));
    }

    fn on_custom_label(&mut self, label: &str) {
        self.note(&format!("custom duration: {label}"));
    }

    fn on_validation_error(&mut self, err: &ValidationError) {
        self.note(&err.to_string());
    }
}

/// Rings the terminal bell. Audio synthesis is left to the terminal.
pub struct TerminalBell;

impl ExpiryAlert for TerminalBell {
    fn play(&mut self, tone: &AlertTone) {
        debug!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration_ms,
            "expiry alert"
        );
        let mut stderr = std::io::stderr();
        if let Err(err) = write!(stderr, "\x07").and_then(|_| writeln!(stderr, "Time's up!")) {
            debug!("failed to ring bell: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_title_while_running() {
        let frame = DisplayFrame::new(1499, true, Category::Work);
        assert_eq!(
            TerminalDisplay::render(&frame, "Pomodoro Timer"),
            "24:59 [work-mode] running | 24:59 - Work Mode"
        );
    }

    #[test]
    fn render_uses_default_title_when_stopped() {
        let frame = DisplayFrame::new(300, false, Category::Rest);
        assert_eq!(
            TerminalDisplay::render(&frame, "Pomodoro Timer"),
            "05:00 [rest-mode] stopped | Pomodoro Timer"
        );
    }
}
