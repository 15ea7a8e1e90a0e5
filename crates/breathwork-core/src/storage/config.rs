//! TOML-based user preferences.
//!
//! Stores:
//! - Chosen breathing pattern (preset id or custom durations)
//! - Session length
//! - Sound cue settings
//! - Haptic cue settings
//!
//! Preferences are stored at `~/.config/breathwork/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::cues::{CueSettings, SoundProfile};
use crate::error::{ConfigError, Result};
use crate::timer::{
    find_pattern, BreathPattern, EngineConfig, DEFAULT_PATTERN_ID, DEFAULT_SESSION_SECS,
};

/// Session preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Built-in pattern id.
    #[serde(default = "default_pattern_id")]
    pub pattern: String,
    /// Overrides `pattern` when set.
    #[serde(default)]
    pub custom_pattern: Option<BreathPattern>,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
}

/// Tone cue preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub profile: SoundProfile,
    #[serde(default)]
    pub mute_holds: bool,
}

/// Vibration preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// User preferences.
///
/// Serialized to/from TOML at `~/.config/breathwork/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
}

fn default_pattern_id() -> String {
    DEFAULT_PATTERN_ID.into()
}
fn default_duration_secs() -> f64 {
    DEFAULT_SESSION_SECS
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f64 {
    0.5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern_id(),
            custom_pattern: None,
            duration_secs: default_duration_secs(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            profile: SoundProfile::default(),
            mute_holds: false,
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self { enabled: true }
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
        if parts.peek().is_none() || key.is_empty() {
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
                Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                Some(serde_json::Value::Number(_)) => {
                    let n = value
                        .parse::<f64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                }
                // Absent optional tables are serialized as null
                Some(serde_json::Value::Null)
                | Some(serde_json::Value::Object(_))
                | Some(serde_json::Value::Array(_)) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                Some(_) => serde_json::Value::String(value.into()),
                None => return Err(unknown()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(load_failed(e.to_string()).into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::SaveFailed`] if writing fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
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

    /// Set a value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result would not form a runnable session. The config is left
    /// unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.engine_config()?;
        *self = updated;
        Ok(())
    }

    /// The pattern this config selects.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPattern`] for an unknown preset id.
    pub fn pattern(&self) -> Result<BreathPattern> {
        if let Some(custom) = self.session.custom_pattern {
            return Ok(custom);
        }
        find_pattern(&self.session.pattern)
            .map(|p| p.pattern)
            .ok_or_else(|| ConfigError::UnknownPattern(self.session.pattern.clone()).into())
    }

    pub fn cue_settings(&self) -> CueSettings {
        CueSettings {
            sound_enabled: self.sound.enabled,
            volume: self.sound.volume,
            profile: self.sound.profile,
            haptics_enabled: self.haptics.enabled,
            mute_holds: self.sound.mute_holds,
        }
    }

    /// Resolve and validate into an engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown preset or any validation failure.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let config = EngineConfig {
            pattern: self.pattern()?,
            total_duration_secs: self.session.duration_secs,
            cues: self.cue_settings(),
        };
        config.validate()?;
        Ok(config)
    }
}
