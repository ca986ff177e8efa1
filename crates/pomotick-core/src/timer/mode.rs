use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Pomodoro preset length.
pub const POMODORO_SECS: u32 = 25 * 60;
/// Short break preset length.
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
/// Long break preset length.
pub const LONG_BREAK_SECS: u32 = 15 * 60;
/// Upper bound for any countdown, custom or preset.
pub const MAX_DURATION_SECS: u32 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Rest,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Rest => "Rest",
        }
    }

    /// Theme marker the host applies to its root surface.
    pub fn theme_class(&self) -> &'static str {
        match self {
            Category::Work => "work-mode",
            Category::Rest => "rest-mode",
        }
    }

    /// The preset a category toggle selects.
    pub fn preset(&self) -> Preset {
        match self {
            Category::Work => Preset::Pomodoro,
            Category::Rest => Preset::ShortBreak,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "rest" | "break" => Ok(Category::Rest),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{other}' (expected work or rest)"),
            }),
        }
    }
}

/// Fixed-length presets selectable from the mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Pomodoro, Preset::ShortBreak, Preset::LongBreak];

    pub fn duration_secs(&self) -> u32 {
        match self {
            Preset::Pomodoro => POMODORO_SECS,
            Preset::ShortBreak => SHORT_BREAK_SECS,
            Preset::LongBreak => LONG_BREAK_SECS,
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" | "work" => Ok(Preset::Pomodoro),
            "short" | "short-break" | "short_break" | "shortbreak" => Ok(Preset::ShortBreak),
            "long" | "long-break" | "long_break" | "longbreak" => Ok(Preset::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown preset '{other}' (expected pomodoro, short or long)"),
            }),
        }
    }
}

/// The active timer mode. Every mode carries its own category, so the
/// Work/Rest marker can never disagree with the selected preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
    Custom { secs: u32, category: Category },
}

impl Mode {
    pub fn duration_secs(&self) -> u32 {
        match self {
            Mode::Pomodoro => POMODORO_SECS,
            Mode::ShortBreak => SHORT_BREAK_SECS,
            Mode::LongBreak => LONG_BREAK_SECS,
            Mode::Custom { secs, .. } => *secs,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Mode::Pomodoro => Category::Work,
            Mode::ShortBreak | Mode::LongBreak => Category::Rest,
            Mode::Custom { category, .. } => *category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Pomodoro => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
            Mode::Custom { .. } => "Custom",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Mode::Custom { .. })
    }
}

impl From<Preset> for Mode {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Pomodoro => Mode::Pomodoro,
            Preset::ShortBreak => Mode::ShortBreak,
            Preset::LongBreak => Mode::LongBreak,
        }
    }
}

/// A validated user-entered duration.
///
/// Seconds are quantized to half minutes: only 0 and 30 are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDuration {
    minutes: u32,
    seconds: u32,
}

impl CustomDuration {
    pub fn new(minutes: u32, seconds: u32) -> Result<Self, ValidationError> {
        let in_range = minutes <= 60 && (seconds == 0 || seconds == 30);
        if !in_range || minutes * 60 + seconds > MAX_DURATION_SECS {
            return Err(ValidationError::CustomDuration { minutes, seconds });
        }
        Ok(Self { minutes, seconds })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn total_secs(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }
}

impl FromStr for CustomDuration {
    type Err = ValidationError;

    /// Parses `MM:SS` or a bare minute count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidValue {
            field: "custom".into(),
            message: format!("cannot parse '{s}' as MM:SS"),
        };
        let (minutes, seconds) = match s.trim().split_once(':') {
            Some((m, sec)) => (
                m.trim().parse::<u32>().map_err(|_| invalid())?,
                sec.trim().parse::<u32>().map_err(|_| invalid())?,
            ),
            None => (s.trim().parse::<u32>().map_err(|_| invalid())?, 0),
        };
        Self::new(minutes, seconds)
    }
}
