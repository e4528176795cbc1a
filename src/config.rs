/// Application configuration
///
/// Values come from, in order (later wins):
/// 1. Built-in defaults
/// 2. `settings.json` in the user's config directory
///    - Linux: ~/.config/mouse-capture/settings.json
///    - macOS: ~/Library/Application Support/mouse-capture/settings.json
///    - Windows: %APPDATA%\mouse-capture\settings.json
/// 3. Environment variables (`.env` files are loaded at start-up)
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::capture::store::DEFAULT_JPEG_QUALITY;
use crate::error::{CaptureError, Result};
use crate::state::registry::REGISTRY_FILE;

const APP_DIR: &str = "mouse-capture";
const SETTINGS_FILE: &str = "settings.json";

pub const ENV_BASE_DIR: &str = "MOUSE_CAPTURE_BASE_DIR";
pub const ENV_JPEG_QUALITY: &str = "MOUSE_CAPTURE_JPEG_QUALITY";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Storage root holding the registry and the daily folders
    pub base_dir: PathBuf,
    /// JPEG quality for saved photos (1-100)
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        let mut base_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        base_dir.push(APP_DIR);
        base_dir.push("mice_data");

        Self {
            base_dir,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Load the configuration from all sources
    pub fn load() -> Result<Self> {
        let config = match Self::settings_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// Get the path where the settings file is looked up
    pub fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(APP_DIR);
        path.push(SETTINGS_FILE);
        Some(path)
    }

    /// Read a settings file; a missing file gives the defaults.
    /// Keys left out of the file keep their default values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let config: Config = serde_json::from_str(&json)
            .map_err(|e| CaptureError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()
    }

    /// Apply overrides from a variable lookup (the process environment
    /// in production)
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_BASE_DIR).filter(|v| !v.trim().is_empty()) {
            self.base_dir = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(ENV_JPEG_QUALITY) {
            self.jpeg_quality = raw.trim().parse().map_err(|_| {
                CaptureError::Config(format!(
                    "{} must be a number from 1 to 100, got '{}'",
                    ENV_JPEG_QUALITY, raw
                ))
            })?;
        }

        self.validate()
    }

    fn validate(self) -> Result<Self> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CaptureError::Config(format!(
                "jpeg_quality must be from 1 to 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(self)
    }

    /// Path of the mouse registry file
    pub fn registry_path(&self) -> PathBuf {
        self.base_dir.join(REGISTRY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.base_dir.ends_with("mouse-capture/mice_data"));
        assert_eq!(config.registry_path(), config.base_dir.join("mice_list.txt"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("settings.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "base_dir": "/srv/lab/mice" }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/lab/mice"));
        assert_eq!(config.jpeg_quality, 90);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::from_file(&path), Err(CaptureError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env(env(&[
                (ENV_BASE_DIR, "/tmp/mice"),
                (ENV_JPEG_QUALITY, " 75 "),
            ]))
            .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/tmp/mice"));
        assert_eq!(config.jpeg_quality, 75);
    }

    #[test]
    fn test_blank_env_base_dir_is_ignored() {
        let config = Config::default().with_env(env(&[(ENV_BASE_DIR, "  ")])).unwrap();
        assert_eq!(config.base_dir, Config::default().base_dir);
    }

    #[test]
    fn test_bad_quality_is_rejected() {
        for bad in ["0", "101", "high", "-5"] {
            let result = Config::default().with_env(env(&[(ENV_JPEG_QUALITY, bad)]));
            assert!(matches!(result, Err(CaptureError::Config(_))), "accepted {bad}");
        }
    }
}
