//! TOML-based server configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::{Dataset, DatasetError};

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults, so an empty file is a valid configuration.
/// Load from TOML with [`AppConfig::from_toml_file`] or use
/// [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Conversational assistant settings.
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Seed data for the in-memory store.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Conversational assistant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    /// Backend: `"openai"` (OpenAI-compatible HTTP API) or `"offline"`.
    pub backend: String,
    /// Base URL of the chat completions API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upstream request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

/// Where the store's seed records come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Built-in preset name, used when `path` is unset.
    pub preset: String,
    /// TOML dataset file; takes priority over `preset`.
    pub path: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            preset: "bengaluru".to_string(),
            path: None,
        }
    }
}

impl DatasetConfig {
    /// Loads the configured dataset.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the file or preset cannot be loaded.
    pub fn load(&self) -> Result<Dataset, DatasetError> {
        match &self.path {
            Some(path) => Dataset::from_toml_file(path),
            None => Dataset::from_preset(&self.preset),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"assistant.temperature"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push(ConfigError::new("server.host", "must not be empty"));
        }

        let a = &self.assistant;
        if a.backend != "openai" && a.backend != "offline" {
            errors.push(ConfigError::new(
                "assistant.backend",
                format!("must be \"openai\" or \"offline\", got \"{}\"", a.backend),
            ));
        }
        if a.backend == "openai" && a.api_base.trim().is_empty() {
            errors.push(ConfigError::new("assistant.api_base", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&a.temperature) {
            errors.push(ConfigError::new("assistant.temperature", "must be in [0.0, 2.0]"));
        }
        if a.max_tokens == 0 {
            errors.push(ConfigError::new("assistant.max_tokens", "must be > 0"));
        }
        if a.timeout_secs == 0 {
            errors.push(ConfigError::new("assistant.timeout_secs", "must be > 0"));
        }

        let d = &self.dataset;
        if d.path.is_none() && !Dataset::PRESETS.contains(&d.preset.as_str()) {
            errors.push(ConfigError::new(
                "dataset.preset",
                format!(
                    "unknown preset \"{}\", available: {}",
                    d.preset,
                    Dataset::PRESETS.join(", ")
                ),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let errors = AppConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[assistant]
backend = "offline"
model = "gpt-4o"
temperature = 0.2
max_tokens = 200

[dataset]
preset = "empty"
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(8080));
        assert_eq!(cfg.as_ref().map(|c| &*c.assistant.backend), Some("offline"));
        assert_eq!(cfg.as_ref().map(|c| &*c.dataset.preset), Some("empty"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = AppConfig::from_toml_str("[server]\nport = 9000\n");
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(9000));
        assert_eq!(cfg.as_ref().map(|c| &*c.server.host), Some("0.0.0.0"));
        assert_eq!(cfg.as_ref().map(|c| c.assistant.max_tokens), Some(500));
        assert_eq!(cfg.as_ref().map(|c| &*c.dataset.preset), Some("bengaluru"));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let result = AppConfig::from_toml_str("[server]\nport = 1\nbogus_field = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_bad_backend() {
        let mut cfg = AppConfig::default();
        cfg.assistant.backend = "carrier-pigeon".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "assistant.backend"));
    }

    #[test]
    fn validation_catches_bad_temperature() {
        let mut cfg = AppConfig::default();
        cfg.assistant.temperature = 3.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "assistant.temperature"));
    }

    #[test]
    fn validation_catches_unknown_preset() {
        let mut cfg = AppConfig::default();
        cfg.dataset.preset = "atlantis".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "dataset.preset"));
    }

    #[test]
    fn dataset_path_overrides_preset() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("data.toml");
        let dataset = r#"
[[cities]]
id = "x"
name = "X"
country = "Y"
centerLat = 0.0
centerLon = 0.0
climateFactor = 1.0
"#;
        fs::write(&path, dataset).expect("dataset file should be written");
        let cfg = DatasetConfig {
            preset: "atlantis".to_string(),
            path: Some(path),
        };
        let ds = cfg.load().expect("file dataset should load");
        assert_eq!(ds.cities.len(), 1);
        assert_eq!(ds.cities[0].id, "x");
    }
}
