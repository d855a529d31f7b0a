//! TOML-based application configuration.
//!
//! Stores the fast-logging endpoint and the user's fasting plan.
//! Configuration lives at `~/.config/fasttrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::plan_by_id;

/// Fast-logging endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bound on each save request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Fasting schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingConfig {
    /// Preset id from the plan table ("16:8", "18:6", "20:4", "custom").
    #[serde(default = "default_plan")]
    pub plan: String,
    /// Goal hours used when `plan` is "custom".
    #[serde(default = "default_custom_goal_hours")]
    pub custom_goal_hours: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fasttrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fasting: FastingConfig,
}

fn default_base_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_plan() -> String {
    "16:8".into()
}
fn default_custom_goal_hours() -> u64 {
    16
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FastingConfig {
    fn default() -> Self {
        Self {
            plan: default_plan(),
            custom_goal_hours: default_custom_goal_hours(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            fasting: FastingConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|d| d.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk, writing the default config on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Resolve the configured goal duration in seconds.
    ///
    /// An unknown plan id falls back to the default plan rather than
    /// failing -- the timer must always have a goal.
    pub fn goal_duration_seconds(&self) -> u64 {
        match plan_by_id(&self.fasting.plan) {
            Some(plan) if plan.is_custom() => self.fasting.custom_goal_hours.saturating_mul(3600),
            Some(plan) => plan.goal_duration_seconds(),
            None => plan_by_id(&default_plan())
                .map(|p| p.goal_duration_seconds())
                .unwrap_or(16 * 3600),
        }
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

    /// Set a config value by dot-separated key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let mut parts = key.split('.').peekable();
        let mut current = &mut json;
        loop {
            let part = parts.next().ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
                let new_value = match existing {
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                            key: key.into(),
                            message: format!("cannot parse '{value}' as number"),
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
                .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        }

        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        self.save()
    }
}
