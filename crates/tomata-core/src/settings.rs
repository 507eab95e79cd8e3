//! TOML-based application settings.
//!
//! Stores the cycle durations and notification preference at
//! `~/.config/tomata/config.toml`. Set TOMATA_ENV=dev to use
//! `~/.config/tomata-dev/` instead. A missing file yields defaults, which
//! are written back so the user has something to edit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;
use crate::error::{ConfigError, Result};

/// `[timer]` section: cycle lengths in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u64,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u64,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// `[notifications]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application settings.
///
/// Serialized to/from TOML at [`Settings::path`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_work_minutes() -> u64 {
    25
}
fn default_short_break_minutes() -> u64 {
    5
}
fn default_long_break_minutes() -> u64 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Returns `~/.config/tomata[-dev]/`, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TOMATA_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("tomata-dev")
    } else {
        base_dir.join("tomata")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl Settings {
    /// Location of the settings file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults back on a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let settings = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(settings)
            }
            Err(_) => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&json, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The value is parsed into the key's
    /// existing type; unknown keys are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        store(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The engine-facing configuration, minutes converted to durations.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            work: Duration::from_secs(self.timer.work_minutes * 60),
            short_break: Duration::from_secs(self.timer.short_break_minutes * 60),
            long_break: Duration::from_secs(self.timer.long_break_minutes * 60),
            sessions_before_long_break: self.timer.sessions_before_long_break,
        }
    }
}

fn store(root: &mut serde_json::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
    let (parent_key, leaf) = key.rsplit_once('.').unwrap_or(("", key));
    let parent = if parent_key.is_empty() {
        &mut *root
    } else {
        parent_key
            .split('.')
            .try_fold(&mut *root, |node, part| node.get_mut(part))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?
    };
    let object = parent
        .as_object_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let existing = object
        .get(leaf)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let parsed = match existing {
        serde_json::Value::Bool(_) => {
            let flag = raw.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse '{raw}' as bool"),
            })?;
            serde_json::Value::Bool(flag)
        }
        serde_json::Value::Number(_) => {
            let number = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse '{raw}' as number"),
            })?;
            serde_json::Value::Number(number.into())
        }
        _ => serde_json::Value::String(raw.to_string()),
    };

    object.insert(leaf.to_string(), parsed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.work_minutes, 25);
        assert_eq!(parsed.timer.sessions_before_long_break, 4);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Settings = toml::from_str("[timer]\nwork_minutes = 50\n").unwrap();
        assert_eq!(parsed.timer.work_minutes, 50);
        assert_eq!(parsed.timer.short_break_minutes, 5);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = Settings::default();
        assert_eq!(settings.get("timer.work_minutes").as_deref(), Some("25"));
        assert_eq!(settings.get("notifications.enabled").as_deref(), Some("true"));
        assert!(settings.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_number_and_bool() {
        let mut settings = Settings::default();
        settings.set("timer.long_break_minutes", "20").unwrap();
        assert_eq!(settings.timer.long_break_minutes, 20);
        settings.set("notifications.enabled", "false").unwrap();
        assert!(!settings.notifications.enabled);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(settings.set("timer.nonexistent", "1").is_err());
        assert!(settings.set("nonexistent.work_minutes", "1").is_err());
    }

    #[test]
    fn set_rejects_unparsable_value() {
        let mut settings = Settings::default();
        assert!(settings.set("timer.work_minutes", "soon").is_err());
        assert!(settings.set("notifications.enabled", "maybe").is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.timer.work_minutes, 25);
        assert!(path.exists());
        let reread = Settings::load_from(&path).unwrap();
        assert_eq!(reread.timer.long_break_minutes, 15);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 5").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn timer_config_converts_minutes() {
        let mut settings = Settings::default();
        settings.timer.work_minutes = 1;
        settings.timer.short_break_minutes = 2;
        let config = settings.timer_config();
        assert_eq!(config.work, Duration::from_secs(60));
        assert_eq!(config.short_break, Duration::from_secs(120));
        assert_eq!(config.sessions_before_long_break, 4);
    }
}
