//! TOML-based preference storage.
//!
//! Persists *preferences* only (default durations, tick cadence); timer
//! state itself never survives the process. Stored at
//! `~/.config/takt/config.toml`, or `takt-dev` when `TAKT_ENV=dev`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::modes::MIN_WORK_MS;

/// Returns `~/.config/takt[-dev]/`, creating it if needed.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("TAKT_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("takt-dev")
    } else {
        base_dir.join("takt")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Tick source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    #[serde(default = "default_tick_interval")]
    pub interval_ms: u64,
}

/// Countdown mode defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownDefaults {
    #[serde(default = "default_countdown_duration")]
    pub default_duration_ms: u64,
}

/// Interval mode defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalDefaults {
    #[serde(default = "default_work")]
    pub work_ms: u64,
    #[serde(default = "default_rest")]
    pub rest_ms: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/takt/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub countdown: CountdownDefaults,
    #[serde(default)]
    pub interval: IntervalDefaults,
}

fn default_tick_interval() -> u64 {
    crate::tick::DEFAULT_TICK_INTERVAL_MS
}
fn default_countdown_duration() -> u64 {
    crate::modes::DEFAULT_DURATION_MS
}
fn default_work() -> u64 {
    20_000
}
fn default_rest() -> u64 {
    10_000
}
fn default_rounds() -> u32 {
    8
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_interval(),
        }
    }
}

impl Default for CountdownDefaults {
    fn default() -> Self {
        Self {
            default_duration_ms: default_countdown_duration(),
        }
    }
}

impl Default for IntervalDefaults {
    fn default() -> Self {
        Self {
            work_ms: default_work(),
            rest_ms: default_rest(),
            rounds: default_rounds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: TickConfig::default(),
            countdown: CountdownDefaults::default(),
            interval: IntervalDefaults::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from an explicit path without touching disk on miss.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut cfg: Config = toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.clamp();
        Ok(cfg)
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply the same bounds the live setters enforce, so a hand-edited
    /// file cannot smuggle in a zero-length cycle or zero cadence.
    fn clamp(&mut self) {
        self.tick.interval_ms = self.tick.interval_ms.max(1);
        self.interval.work_ms = self.interval.work_ms.max(MIN_WORK_MS);
        self.interval.rounds = self.interval.rounds.max(1);
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, persisting the result.
    /// The value is parsed against the existing leaf's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = &mut json;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };
                obj.insert(part.to_string(), new_value);
                break;
            }
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        let mut updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.clamp();
        *self = updated;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.tick.interval_ms, 50);
        assert_eq!(cfg.countdown.default_duration_ms, 300_000);
        assert_eq!(cfg.interval.work_ms, 20_000);
        assert_eq!(cfg.interval.rest_ms, 10_000);
        assert_eq!(cfg.interval.rounds, 8);
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.interval.rounds = 12;
        cfg.tick.interval_ms = 25;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.interval.rounds, 12);
        assert_eq!(loaded.tick.interval_ms, 25);
        assert_eq!(loaded.countdown.default_duration_ms, 300_000);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[interval]\nrounds = 3\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.interval.rounds, 3);
        assert_eq!(cfg.interval.work_ms, 20_000);
        assert_eq!(cfg.tick.interval_ms, 50);
    }

    #[test]
    fn hand_edited_zeroes_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[tick]\ninterval_ms = 0\n[interval]\nwork_ms = 0\nrounds = 0\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.tick.interval_ms, 1);
        assert_eq!(cfg.interval.work_ms, MIN_WORK_MS);
        assert_eq!(cfg.interval.rounds, 1);
    }

    #[test]
    fn get_by_dot_path() {
        let cfg = Config::default();
        assert_eq!(cfg.get("tick.interval_ms").as_deref(), Some("50"));
        assert_eq!(cfg.get("interval.rounds").as_deref(), Some("8"));
        assert!(cfg.get("interval.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn garbage_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml {{{").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
