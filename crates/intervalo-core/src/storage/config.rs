//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default session/break lengths and iteration count for new timers
//! - Tick period for the live runner
//!
//! Configuration is stored at `~/.config/intervalo/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timer::TimerConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Timer defaults applied to a freshly created engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDefaults {
    #[serde(default = "default_session_seconds")]
    pub session_seconds: u32,
    #[serde(default = "default_break_seconds")]
    pub break_seconds: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

/// Live runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/intervalo/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerDefaults,
    #[serde(default)]
    pub ticker: TickerConfig,
}

fn default_session_seconds() -> u32 {
    TimerConfig::DEFAULT_SESSION_SECONDS
}
fn default_break_seconds() -> u32 {
    TimerConfig::DEFAULT_BREAK_SECONDS
}
fn default_iterations() -> u32 {
    TimerConfig::DEFAULT_ITERATIONS
}
fn default_period_ms() -> u64 {
    1000
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            session_seconds: default_session_seconds(),
            break_seconds: default_break_seconds(),
            iterations: default_iterations(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load from `dir/config.toml`, or write and return the defaults when
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or holds
    /// zero timer values, or if the default config cannot be written.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Load from `dir`, returning defaults on any error.
    pub fn load_or_default(dir: &Path) -> Self {
        match Self::load_from(dir) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("using default configuration: {e}");
                Self::default()
            }
        }
    }

    /// Persist to `dir/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values a timer cannot run with.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        TimerConfig::new(
            self.timer.session_seconds,
            self.timer.break_seconds,
            self.timer.iterations,
        )?;
        if self.ticker.period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ticker.period_ms".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not touch disk.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
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

    /// Timer config for a new engine. Out-of-range values are coerced.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::coerced(
            self.timer.session_seconds,
            self.timer.break_seconds,
            self.timer.iterations,
        )
    }
}
