//! Configuration management for chatgpt.
//!
//! The API key always comes from the `CHATGPT_API_KEY` environment variable.
//! Everything else is optional and loaded from `~/.config/chatgpt/config.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the service credential.
pub const API_KEY_VAR: &str = "CHATGPT_API_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Settings for the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model identifier (default: gpt-3.5-turbo-instruct).
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the API (default: https://api.openai.com/v1).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Default max-token budget when `--tokens` is not given.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    420
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("chatgpt"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Read the API key from the environment.
///
/// An empty value counts as missing.
pub fn api_key() -> crate::error::Result<String> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> crate::error::Result<String> {
    value
        .filter(|key| !key.is_empty())
        .ok_or(crate::error::Error::MissingCredential { var: API_KEY_VAR })
}
