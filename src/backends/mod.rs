//! Backend module for Palaver
//!
//! This module contains the text-generation backend abstraction and the
//! implementations shipped with the harness: the Ollama HTTP backend and
//! the deterministic scripted backend.

pub mod base;
pub mod ollama;
pub mod scripted;

pub use base::{
    GenerationBackend, GenerationOptions, GenerationRequest, GenerationResult, TokenUsage,
};
pub use ollama::OllamaBackend;
pub use scripted::ScriptedBackend;

use crate::config::Config;
use crate::error::{PalaverError, Result};
use std::sync::Arc;

/// Create a backend instance based on configuration
///
/// # Arguments
///
/// * `config` - Harness configuration selecting the backend type
///
/// # Errors
///
/// Returns error if the configured backend type is unknown or
/// initialization fails
///
/// # Examples
///
/// ```
/// use palaver::backends::{create_backend, GenerationBackend};
/// use palaver::config::Config;
///
/// let mut config = Config::default();
/// config.backend.backend_type = "scripted".to_string();
/// let backend = create_backend(&config).unwrap();
/// assert_eq!(backend.name(), "scripted");
/// ```
pub fn create_backend(config: &Config) -> Result<Arc<dyn GenerationBackend>> {
    match config.backend.backend_type.as_str() {
        "ollama" => Ok(Arc::new(OllamaBackend::new(config.backend.ollama.clone())?)),
        "scripted" => Ok(Arc::new(ScriptedBackend::from_texts(
            config.backend.scripted.replies.clone(),
        ))),
        other => Err(PalaverError::Config(format!(
            "Unknown backend type: {}",
            other
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_backend_ollama() {
        let mut config = Config::default();
        config.backend.backend_type = "ollama".to_string();
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "ollama");
    }

    #[test]
    fn test_create_backend_scripted() {
        let mut config = Config::default();
        config.backend.backend_type = "scripted".to_string();
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "scripted");
    }

    #[test]
    fn test_create_backend_invalid_type() {
        let mut config = Config::default();
        config.backend.backend_type = "carrier-pigeon".to_string();
        let err = create_backend(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown backend type"));
    }
}
