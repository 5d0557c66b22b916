//! Configuration loading, validation, and management for shellwright.
//!
//! Loads configuration from `~/.shellwright/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use shellwright_core::Credential;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.shellwright/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the chat-completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// HTTP timeout for one completion call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Replaces the built-in system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Directory that file directives and commands run in (process cwd when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<PathBuf>,

    /// Sent as `X-Title`
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// Sent as `HTTP-Referer`
    #[serde(default = "default_referer")]
    pub referer: String,
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "mistralai/mistral-7b-instruct".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_app_title() -> String {
    "shellwright".into()
}
fn default_referer() -> String {
    "https://localhost".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .field("workspace_dir", &self.workspace_dir)
            .field("app_title", &self.app_title)
            .field("referer", &self.referer)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.shellwright/config.toml).
    ///
    /// Also checks environment variables:
    /// - `SHELLWRIGHT_API_KEY`, then `OPENROUTER_API_KEY` (only if the file has no key)
    /// - `SHELLWRIGHT_MODEL`
    /// - `SHELLWRIGHT_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.credential().is_none()
            && let Some(key) =
                non_blank("SHELLWRIGHT_API_KEY").or_else(|| non_blank("OPENROUTER_API_KEY"))
        {
            self.api_key = Some(key);
        }

        if let Some(model) = non_blank("SHELLWRIGHT_MODEL") {
            self.model = model;
        }

        if let Some(url) = non_blank("SHELLWRIGHT_API_URL") {
            self.api_url = url;
        }
    }

    /// Persist the configuration as TOML, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// The API key as a [`Credential`], if one is configured.
    pub fn credential(&self) -> Option<Credential> {
        self.api_key.as_deref().and_then(Credential::new)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".shellwright")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
            system_prompt: None,
            workspace_dir: None,
            app_title: default_app_title(),
            referer: default_referer(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for shellwright_core::Error {
    fn from(err: ConfigError) -> Self {
        shellwright_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "mistralai/mistral-7b-instruct");
        assert!(config.api_url.contains("openrouter.ai"));
        assert!(config.credential().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            max_tokens: Some(512),
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.max_tokens, Some(512));
        assert_eq!(parsed.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.model, "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [unterminated").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"openai/gpt-4o-mini\"\nworkspace_dir = \"/srv/work\"\n")
            .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.workspace_dir, Some(PathBuf::from("/srv/work")));
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            api_key: Some("sk-or-v1-saved".into()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.credential().unwrap().expose(), "sk-or-v1-saved");
    }

    #[test]
    fn env_key_used_when_file_has_none() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("OPENROUTER_API_KEY", "sk-or-env")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-or-env"));
    }

    #[test]
    fn shellwright_key_beats_openrouter_key() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("OPENROUTER_API_KEY", "sk-or-env"),
            ("SHELLWRIGHT_API_KEY", "sk-sw-env"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-sw-env"));
    }

    #[test]
    fn file_key_is_not_overridden() {
        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("OPENROUTER_API_KEY", "sk-or-env")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut config = AppConfig {
            api_key: Some("  ".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("OPENROUTER_API_KEY", ""), ("SHELLWRIGHT_MODEL", " ")]));
        assert!(config.credential().is_none());
        assert_eq!(config.model, "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn model_and_url_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("SHELLWRIGHT_MODEL", "anthropic/claude-3-haiku"),
            ("SHELLWRIGHT_API_URL", "http://localhost:11434/v1"),
        ]));
        assert_eq!(config.model, "anthropic/claude-3-haiku");
        assert_eq!(config.api_url, "http://localhost:11434/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-very-secret".into()),
            ..AppConfig::default()
        };
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-very-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn default_config_serializes_without_key() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("openrouter.ai"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn load_failure_becomes_core_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();

        let err: shellwright_core::Error = AppConfig::load_from(&path).unwrap_err().into();
        match err {
            shellwright_core::Error::Config { message } => {
                assert!(message.contains("Failed to parse config file"));
                assert!(message.contains("config.toml"));
            }
            other => panic!("expected Error::Config, got {other:?}"),
        }
    }
}
