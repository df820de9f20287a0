//! TOML-based application configuration.
//!
//! Stores the deploy-time constants of the tracker:
//! - Tracked date window
//! - Reward, penalty and bonus amounts
//! - Confirmation display delay
//!
//! Configuration is stored at `~/.config/dailydose/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::DayRange;
use crate::error::ConfigError;

/// Tracked date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
}

/// Money moved by each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_standard_reward")]
    pub standard_reward: i64,
    #[serde(default = "default_standard_penalty")]
    pub standard_penalty: i64,
    #[serde(default = "default_auto_miss_penalty")]
    pub auto_miss_penalty: i64,
    /// The one date that pays `bonus_amount` instead of `standard_reward`.
    #[serde(default = "default_bonus_date")]
    pub bonus_date: NaiveDate,
    #[serde(default = "default_bonus_amount")]
    pub bonus_amount: i64,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a decision confirmation stays up before auto-closing.
    #[serde(default = "default_confirmation_delay_ms")]
    pub confirmation_delay_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dailydose/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 2).unwrap_or_default()
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 31).unwrap_or_default()
}
fn default_standard_reward() -> i64 {
    500
}
fn default_standard_penalty() -> i64 {
    1000
}
fn default_auto_miss_penalty() -> i64 {
    1000
}
fn default_bonus_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 5).unwrap_or_default()
}
fn default_bonus_amount() -> i64 {
    30_000
}
fn default_confirmation_delay_ms() -> u64 {
    3000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            standard_reward: default_standard_reward(),
            standard_penalty: default_standard_penalty(),
            auto_miss_penalty: default_auto_miss_penalty(),
            bonus_date: default_bonus_date(),
            bonus_amount: default_bonus_amount(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirmation_delay_ms: default_confirmation_delay_ms(),
        }
    }
}

impl RewardsConfig {
    pub fn is_bonus_date(&self, date: NaiveDate) -> bool {
        date == self.bonus_date
    }

    /// Reward for completing `date`.
    pub fn reward_for(&self, date: NaiveDate) -> i64 {
        if self.is_bonus_date(date) {
            self.bonus_amount
        } else {
            self.standard_reward
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
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
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

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk or return (and write) the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk. An
    /// existing file is never overwritten.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Same as [`Config::load`] for an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject windows and amounts that would break the ledger rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.day_range()?;
        let amounts = [
            ("rewards.standard_reward", self.rewards.standard_reward),
            ("rewards.standard_penalty", self.rewards.standard_penalty),
            ("rewards.auto_miss_penalty", self.rewards.auto_miss_penalty),
            ("rewards.bonus_amount", self.rewards.bonus_amount),
        ];
        for (key, amount) in amounts {
            if amount < 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("amount must not be negative, got {amount}"),
                });
            }
        }
        Ok(())
    }

    /// The configured tracking window.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is after the end date.
    pub fn day_range(&self) -> Result<DayRange, ConfigError> {
        DayRange::new(self.tracker.start_date, self.tracker.end_date)
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

    /// Set a config value by key without saving. Returns error if key is
    /// unknown or the result fails validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            Self::default()
        })
    }
}
