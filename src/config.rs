//! Application configuration stored in ~/.eduplan/config.json.
//!
//! Every field is optional on disk. A missing or unreadable file yields the
//! defaults, so a fresh install works without any setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Remote advisory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

/// Top-level config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    /// Override for the SQLite database location.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Home directory not found, using default configuration");
                Self::default()
            }
        }
    }

    /// Load from an explicit path; missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config at {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".eduplan").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.json"));
        assert!(!config.advisory.enabled);
        assert_eq!(config.advisory.model, "gpt-4o-mini");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"advisory":{"enabled":true,"apiKey":"sk-test"}}"#)
            .expect("write");

        let config = AppConfig::load_from(&path);
        assert!(config.advisory.enabled);
        assert_eq!(config.advisory.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.advisory.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").expect("write");

        let config = AppConfig::load_from(&path);
        assert!(!config.advisory.enabled);
    }
}
