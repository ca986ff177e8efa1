//! TOML-based application configuration.
//!
//! Stores user preferences only:
//! - Expiry alert settings
//! - Message rotation cadence and optional seed
//! - Default window title
//! - Log level
//!
//! Timer state is never written here. Configuration is stored at
//! `~/.config/pomotick/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{AlertTone, SessionSettings, DEFAULT_TITLE, TICK_PERIOD};

/// Expiry alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: u32,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

/// Motivational message configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_rotate_secs")]
    pub rotate_secs: u64,
    /// Fixed seed for reproducible message order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
}

/// Logging configuration. `POMOTICK_LOG` overrides `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotick/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_frequency_hz() -> u32 {
    440
}
fn default_duration_ms() -> u64 {
    500
}
fn default_rotate_secs() -> u64 {
    30
}
fn default_title() -> String {
    DEFAULT_TITLE.into()
}
fn default_level() -> String {
    "warn".into()
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_hz: default_frequency_hz(),
            duration_ms: default_duration_ms(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            rotate_secs: default_rotate_secs(),
            seed: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let new_value = match obj.get(part) {
                Some(serde_json::Value::Bool(_)) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                Some(serde_json::Value::Number(_)) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                Some(serde_json::Value::String(_)) => serde_json::Value::String(value.into()),
                Some(_) => serde_json::from_str::<serde_json::Value>(value)
                    .map_err(|e| invalid(e.to_string()))?,
                None if Self::is_optional_key(key) => {
                    serde_json::from_str::<serde_json::Value>(value)
                        .map_err(|e| invalid(e.to_string()))?
                }
                None => return Err(unknown()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    // Optional keys are skipped when unset, so they are missing from the
    // JSON view until a value is written.
    fn is_optional_key(key: &str) -> bool {
        key == "messages.seed"
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.messages.rotate_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "messages.rotate_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Session tunables for a new timer session.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            tick_period: TICK_PERIOD,
            rotate_period: Duration::from_secs(self.messages.rotate_secs.max(1)),
            tone: AlertTone {
                frequency_hz: self.alert.frequency_hz,
                duration_ms: self.alert.duration_ms,
            },
            alert_enabled: self.alert.enabled,
            message_seed: self.messages.seed,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.alert.enabled);
        assert_eq!(parsed.alert.frequency_hz, 440);
        assert_eq!(parsed.messages.seed, None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[messages]\nseed = 7\n").unwrap();
        assert_eq!(parsed.messages.seed, Some(7));
        assert_eq!(parsed.messages.rotate_secs, 30);
        assert_eq!(parsed.display.default_title, "Pomodoro Timer");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("alert.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("alert.duration_ms").as_deref(), Some("500"));
        assert_eq!(cfg.get("display.default_title").as_deref(), Some("Pomodoro Timer"));
        assert!(cfg.get("alert.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("alert.enabled", "false").unwrap();
        cfg.apply("messages.rotate_secs", "45").unwrap();
        cfg.apply("logging.level", "debug").unwrap();
        assert!(!cfg.alert.enabled);
        assert_eq!(cfg.messages.rotate_secs, 45);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn apply_sets_optional_seed() {
        let mut cfg = Config::default();
        cfg.apply("messages.seed", "42").unwrap();
        assert_eq!(cfg.messages.seed, Some(42));
        assert_eq!(cfg.session_settings().message_seed, Some(42));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.apply("alert.volume", "3").is_err());
        assert!(cfg.apply("", "3").is_err());
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("alert.enabled", "loud").is_err());
        assert!(cfg.apply("alert.frequency_hz", "-3").is_err());
        assert!(cfg.alert.enabled);
    }

    #[test]
    fn apply_rejects_zero_rotation() {
        let mut cfg = Config::default();
        assert!(cfg.apply("messages.rotate_secs", "0").is_err());
        assert_eq!(cfg.messages.rotate_secs, 30);
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.alert.frequency_hz, 440);

        let mut cfg = cfg;
        cfg.apply("alert.frequency_hz", "880").unwrap();
        cfg.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.alert.frequency_hz, 880);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "alert = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }

    #[test]
    fn session_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.apply("alert.duration_ms", "250").unwrap();
        let settings = cfg.session_settings();
        assert_eq!(settings.tone.duration_ms, 250);
        assert_eq!(settings.rotate_period, Duration::from_secs(30));
        assert!(settings.alert_enabled);
    }
}
