//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Timeline strip geometry (slot height, label column, width)
//! - Where day files live
//! - Editor behaviour
//!
//! Configuration is stored at `~/.config/dayline/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timeline::Layout;

/// Day file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `YYYYMMDD.json` files. Empty means `<data dir>/diaries`.
    #[serde(default)]
    pub diaries_dir: String,
}

/// Editor behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Ask for titles without blocking the release (two-phase creation).
    #[serde(default)]
    pub deferred_titles: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayline/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            diaries_dir: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            storage: StorageConfig::default(),
            editor: EditorConfig::default(),
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
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<f64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("only leaf values can be set".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.validate().map_err(|e| ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
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
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Rejects a layout the timeline strip cannot be drawn with.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the `layout` table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.check().map_err(|message| ConfigError::InvalidValue {
            key: "layout".to_string(),
            message,
        })
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Directory of day files, created on demand by the store.
    pub fn diaries_dir(&self) -> Result<PathBuf, ConfigError> {
        if self.storage.diaries_dir.is_empty() {
            Ok(data_dir()?.join("diaries"))
        } else {
            Ok(PathBuf::from(&self.storage.diaries_dir))
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
        assert_eq!(parsed.layout.slot_height, 12.0);
        assert!(!parsed.editor.deferred_titles);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("[layout]\nslot_height = 20.0\n").unwrap();
        assert_eq!(parsed.layout.slot_height, 20.0);
        assert_eq!(parsed.layout.left_margin, 60.0);
        assert!(parsed.storage.diaries_dir.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("editor.deferred_titles").as_deref(), Some("false"));
        assert_eq!(cfg.get("layout.width").as_deref(), Some("500.0"));
        assert!(cfg.get("layout.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_nested_fields() {
        let mut cfg = Config::default();
        cfg.set_value("layout.slot_height", "16").unwrap();
        cfg.set_value("editor.deferred_titles", "true").unwrap();
        cfg.set_value("storage.diaries_dir", "/tmp/diaries").unwrap();
        assert_eq!(cfg.layout.slot_height, 16.0);
        assert!(cfg.editor.deferred_titles);
        assert_eq!(cfg.storage.diaries_dir, "/tmp/diaries");
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("layout.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set_value("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("editor.deferred_titles", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("layout", "1"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_value_rejects_unusable_layout() {
        let mut cfg = Config::default();
        for (key, value) in [
            ("layout.slot_height", "-5"),
            ("layout.slot_height", "0"),
            ("layout.width", "40"),
            ("layout.left_margin", "-1"),
        ] {
            assert!(
                matches!(cfg.set_value(key, value), Err(ConfigError::InvalidValue { .. })),
                "{key}={value}"
            );
        }
        assert_eq!(cfg.layout.slot_height, 12.0);
        assert_eq!(cfg.layout.width, 500.0);
    }

    #[test]
    fn toml_with_unusable_layout_fails_validation() {
        let parsed: Config = toml::from_str("[layout]\nslot_height = 0.0\n").unwrap();
        assert!(matches!(parsed.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn explicit_diaries_dir_is_used_verbatim() {
        let mut cfg = Config::default();
        cfg.storage.diaries_dir = "/srv/diaries".into();
        assert_eq!(cfg.diaries_dir().unwrap(), PathBuf::from("/srv/diaries"));
    }
}
