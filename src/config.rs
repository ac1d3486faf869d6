//! Configuration management for Palaver
//!
//! This module handles loading, parsing, and validating harness
//! configuration from YAML files with sensible defaults.

use crate::error::{PalaverError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure for Palaver
///
/// Holds the backend selection and the harness-level settings that apply
/// to every conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend configuration (Ollama, scripted)
    #[serde(default)]
    pub backend: BackendConfig,

    /// Harness behavior configuration
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Backend configuration
///
/// Specifies which generation backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Type of backend to use ("ollama" or "scripted")
    #[serde(rename = "type", default = "default_backend_type")]
    pub backend_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Scripted backend configuration
    #[serde(default)]
    pub scripted: ScriptedConfig,
}

fn default_backend_type() -> String {
    "ollama".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: default_backend_type(),
            ollama: OllamaConfig::default(),
            scripted: ScriptedConfig::default(),
        }
    }
}

/// Ollama backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Scripted backend configuration
///
/// The default replies satisfy the built-in memory-retention scenario, so
/// `palaver check` works out of the box with no network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedConfig {
    /// Canned replies, served in order
    #[serde(default = "default_scripted_replies")]
    pub replies: Vec<String>,
}

fn default_scripted_replies() -> Vec<String> {
    vec![
        "Nice to meet you, Helen.".to_string(),
        "You're a data scientist.".to_string(),
        "Your name is Helen.".to_string(),
    ]
}

impl Default for ScriptedConfig {
    fn default() -> Self {
        Self {
            replies: default_scripted_replies(),
        }
    }
}

/// Harness behavior configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Optional system prompt seeded before the first turn
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Backend-interpreted generation options, passed through opaquely
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// malformed file is an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use palaver::config::Config;
    ///
    /// let config = Config::load("config/config.yaml").unwrap();
    /// config.validate().unwrap();
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `PalaverError::Config` for an unknown backend type or an
    /// empty model identifier.
    pub fn validate(&self) -> Result<()> {
        match self.backend.backend_type.as_str() {
            "ollama" | "scripted" => {}
            other => {
                return Err(PalaverError::Config(format!(
                    "unknown backend type: {}",
                    other
                ))
                .into())
            }
        }

        if self.backend.backend_type == "ollama" {
            if self.backend.ollama.model.trim().is_empty() {
                return Err(
                    PalaverError::Config("ollama model must not be empty".to_string()).into(),
                );
            }
            if self.backend.ollama.host.trim().is_empty() {
                return Err(
                    PalaverError::Config("ollama host must not be empty".to_string()).into(),
                );
            }
        }

        Ok(())
    }

    /// The model identifier the configured backend will use
    pub fn model(&self) -> String {
        match self.backend.backend_type.as_str() {
            "ollama" => self.backend.ollama.model.clone(),
            _ => self.backend.backend_type.clone(),
        }
    }
}
