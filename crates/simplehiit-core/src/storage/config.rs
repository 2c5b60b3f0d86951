//! TOML-based application configuration.
//!
//! Stores the workout preferences:
//! - Work and rest period lengths
//! - Number of work periods per cycle and number of cycles
//! - Countdown lengths and the countdown beep switch
//! - Which exercise types may be picked
//!
//! Configuration is stored at `~/.config/simplehiit/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result, SessionError, ValidationError};
use crate::exercise::{selected_types, ExerciseType, ExerciseTypeSelected};
use crate::session::{SessionSettings, User};

const MIN_PERIOD_MS: u64 = 1000;
const MAX_PERIOD_MS: u64 = 3_600_000;
const MAX_COUNT: u64 = 100;

/// Timing preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_work_period")]
    pub work_period_length_ms: u64,
    #[serde(default = "default_rest_period")]
    pub rest_period_length_ms: u64,
    #[serde(default = "default_work_periods")]
    pub number_of_work_periods: usize,
    #[serde(default = "default_cycles")]
    pub number_cumulated_cycles: usize,
    #[serde(default = "default_true")]
    pub beep_sound_count_down_active: bool,
    #[serde(default = "default_session_start_count_down")]
    pub session_start_count_down_length_ms: u64,
    #[serde(default = "default_periods_start_count_down")]
    pub periods_start_count_down_length_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/simplehiit/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default = "ExerciseTypeSelected::all_selected")]
    pub exercise_types: Vec<ExerciseTypeSelected>,
}

// Default functions
fn default_work_period() -> u64 {
    20_000
}
fn default_rest_period() -> u64 {
    10_000
}
fn default_work_periods() -> usize {
    8
}
fn default_cycles() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_session_start_count_down() -> u64 {
    20_000
}
fn default_periods_start_count_down() -> u64 {
    5_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_period_length_ms: default_work_period(),
            rest_period_length_ms: default_rest_period(),
            number_of_work_periods: default_work_periods(),
            number_cumulated_cycles: default_cycles(),
            beep_sound_count_down_active: true,
            session_start_count_down_length_ms: default_session_start_count_down(),
            periods_start_count_down_length_ms: default_periods_start_count_down(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            exercise_types: ExerciseTypeSelected::all_selected(),
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
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `config.toml` inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path_in(&data_dir()?))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path_in(&data_dir()?))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
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
            }
            .into()),
        }
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

    /// Set a value by dot-separated key. The result must still validate;
    /// on error `self` is left unchanged.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn set_exercise_type_selected(&mut self, exercise_type: ExerciseType, selected: bool) {
        match self
            .exercise_types
            .iter_mut()
            .find(|t| t.exercise_type == exercise_type)
        {
            Some(entry) => entry.selected = selected,
            None => self.exercise_types.push(ExerciseTypeSelected {
                exercise_type,
                selected,
            }),
        }
    }

    /// # Errors
    /// Returns a validation error for out-of-range timings or counts, and
    /// [`SessionError::NoExerciseTypesSelected`] if every type is off.
    pub fn validate(&self) -> Result<()> {
        let s = &self.session;
        check_range(
            "work_period_length_ms",
            s.work_period_length_ms,
            MIN_PERIOD_MS,
            MAX_PERIOD_MS,
        )?;
        check_range(
            "rest_period_length_ms",
            s.rest_period_length_ms,
            MIN_PERIOD_MS,
            MAX_PERIOD_MS,
        )?;
        check_range(
            "number_of_work_periods",
            s.number_of_work_periods as u64,
            1,
            MAX_COUNT,
        )?;
        check_range(
            "number_cumulated_cycles",
            s.number_cumulated_cycles as u64,
            1,
            MAX_COUNT,
        )?;
        check_range(
            "session_start_count_down_length_ms",
            s.session_start_count_down_length_ms,
            0,
            MAX_PERIOD_MS,
        )?;
        let shortest = s.work_period_length_ms.min(s.rest_period_length_ms);
        if s.periods_start_count_down_length_ms > shortest {
            return Err(ValidationError::invalid(
                "periods_start_count_down_length_ms",
                format!("must not exceed the shortest period ({shortest} ms)"),
            )
            .into());
        }
        if selected_types(&self.exercise_types).is_empty() {
            return Err(SessionError::NoExerciseTypesSelected.into());
        }
        Ok(())
    }

    /// Settings for a session with `users`.
    ///
    /// # Errors
    /// Fails if the config is invalid or `users` is empty.
    pub fn session_settings(&self, users: Vec<User>) -> Result<SessionSettings> {
        self.validate()?;
        if users.is_empty() {
            return Err(CoreError::Session(SessionError::NoUsersSelected));
        }
        let s = &self.session;
        Ok(SessionSettings {
            number_cumulated_cycles: s.number_cumulated_cycles,
            work_period_length_ms: s.work_period_length_ms,
            rest_period_length_ms: s.rest_period_length_ms,
            number_of_work_periods: s.number_of_work_periods,
            cycle_length_ms: (s.work_period_length_ms + s.rest_period_length_ms)
                * s.number_of_work_periods as u64,
            beep_sound_count_down_active: s.beep_sound_count_down_active,
            session_start_count_down_length_ms: s.session_start_count_down_length_ms,
            periods_start_count_down_length_ms: s.periods_start_count_down_length_ms,
            users,
            exercise_types: self.exercise_types.clone(),
        })
    }
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<()> {
    if value < min || value > max {
        return Err(
            ValidationError::invalid(field, format!("must be between {min} and {max}")).into(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Ann".into(),
            selected: true,
        }
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[session]\nwork_period_length_ms = 45000\n").unwrap();
        assert_eq!(parsed.session.work_period_length_ms, 45_000);
        assert_eq!(parsed.session.rest_period_length_ms, 10_000);
        assert_eq!(parsed.exercise_types.len(), ExerciseType::ALL.len());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.work_period_length_ms").as_deref(), Some("20000"));
        assert_eq!(cfg.get("session.beep_sound_count_down_active").as_deref(), Some("true"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("session.rest_period_length_ms", "15000").unwrap();
        cfg.set("session.beep_sound_count_down_active", "false").unwrap();
        assert_eq!(cfg.session.rest_period_length_ms, 15_000);
        assert!(!cfg.session.beep_sound_count_down_active);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("session.nonexistent", "1").is_err());
        assert!(cfg.set("session.number_of_work_periods", "many").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_values_failing_validation() {
        let mut cfg = Config::default();
        let err = cfg.set("session.work_period_length_ms", "500").unwrap_err();
        assert_eq!(err.code(), "INVALID_SETTINGS");
        assert_eq!(cfg.session.work_period_length_ms, 20_000);
    }

    #[test]
    fn set_rejects_values_that_would_overflow_durations() {
        let mut cfg = Config::default();
        for (key, value) in [
            ("session.work_period_length_ms", u64::MAX.to_string()),
            ("session.rest_period_length_ms", "3600001".to_string()),
            ("session.number_of_work_periods", u64::MAX.to_string()),
            ("session.number_cumulated_cycles", "101".to_string()),
            ("session.session_start_count_down_length_ms", u64::MAX.to_string()),
        ] {
            let err = cfg.set(key, &value).unwrap_err();
            assert_eq!(err.code(), "INVALID_SETTINGS", "{key}");
        }
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn largest_accepted_settings_do_not_overflow() {
        let mut cfg = Config::default();
        cfg.set("session.work_period_length_ms", "3600000").unwrap();
        cfg.set("session.rest_period_length_ms", "3600000").unwrap();
        cfg.set("session.number_of_work_periods", "100").unwrap();
        cfg.set("session.number_cumulated_cycles", "100").unwrap();
        let settings = cfg.session_settings(vec![user()]).unwrap();
        assert_eq!(settings.cycle_length_ms, 720_000_000);
    }

    #[test]
    fn countdown_longer_than_a_period_is_invalid() {
        let mut cfg = Config::default();
        cfg.session.periods_start_count_down_length_ms = 11_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn session_settings_computes_cycle_length() {
        let settings = Config::default().session_settings(vec![user()]).unwrap();
        assert_eq!(settings.cycle_length_ms, 240_000);
        assert_eq!(settings.users.len(), 1);
    }

    #[test]
    fn session_settings_requires_users_and_types() {
        let mut cfg = Config::default();
        let err = cfg.session_settings(vec![]).unwrap_err();
        assert_eq!(err.code(), "NO_USERS_SELECTED");

        for t in ExerciseType::ALL {
            cfg.set_exercise_type_selected(t, false);
        }
        let err = cfg.session_settings(vec![user()]).unwrap_err();
        assert_eq!(err.code(), "NO_EXERCISE_TYPES_SELECTED");
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::path_in(dir.path());
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::path_in(dir.path());
        std::fs::write(&path, "session = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
