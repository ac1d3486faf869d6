//! Ollama backend implementation for Palaver
//!
//! This module implements the GenerationBackend trait for Ollama, connecting
//! to a local or remote Ollama server's chat endpoint to generate
//! completions from a full conversation history.

use crate::config::OllamaConfig;
use crate::error::{PalaverError, Result};
use crate::backends::{GenerationBackend, GenerationRequest, GenerationResult, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama chat backend
///
/// Connects to an Ollama server (local or remote) and drives its
/// non-streaming `/api/chat` endpoint. All entries of the request's
/// [`GenerationOptions`](crate::backends::GenerationOptions) are forwarded
/// verbatim into Ollama's `options` object; keys Ollama recognizes (e.g.
/// `temperature`, `num_predict`, `seed`) take effect and unknown keys are
/// ignored server-side.
///
/// # Examples
///
/// ```no_run
/// use palaver::backends::{GenerationBackend, GenerationOptions, GenerationRequest};
/// use palaver::backends::ollama::OllamaBackend;
/// use palaver::config::OllamaConfig;
/// use palaver::store::Turn;
///
/// # async fn example() -> palaver::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
/// };
/// let backend = OllamaBackend::new(config)?;
/// let request = GenerationRequest::new(
///     "llama3.2:latest",
///     vec![Turn::user("Hello!")],
///     GenerationOptions::new(),
/// );
/// let result = backend.generate(&request).await?;
/// println!("{}", result.text);
/// # Ok(())
/// # }
/// ```
pub struct OllamaBackend {
    client: Client,
    host: String,
}

/// Request structure for Ollama's chat API
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    options: serde_json::Map<String, serde_json::Value>,
}

/// Message structure for Ollama's chat API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama's chat API
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaBackend {
    /// Create a new Ollama backend instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::backends::ollama::OllamaBackend;
    /// use palaver::config::OllamaConfig;
    ///
    /// let backend = OllamaBackend::new(OllamaConfig::default());
    /// assert!(backend.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("palaver/0.1.0")
            .build()
            .map_err(|e| PalaverError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Ollama backend: host={}", config.host);

        Ok(Self {
            client,
            host: config.host,
        })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Convert harness turns to Ollama chat messages
    fn convert_turns(request: &GenerationRequest) -> Vec<OllamaChatMessage> {
        request
            .turns
            .iter()
            .map(|turn| OllamaChatMessage {
                role: turn.role.to_string(),
                content: turn.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let url = format!("{}/api/chat", self.host);

        let chat_request = OllamaChatRequest {
            model: request.model.clone(),
            messages: Self::convert_turns(request),
            stream: false,
            options: request.options.entries.clone().into_iter().collect(),
        };

        tracing::debug!(
            request_id = %request.id,
            "Sending Ollama chat request: model={}, {} messages",
            chat_request.model,
            chat_request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request.id, "Ollama request failed: {}", e);
                PalaverError::Backend(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(PalaverError::Backend(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let chat_response: OllamaChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            PalaverError::Backend(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            request_id = %request.id,
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            chat_response.done,
            chat_response.prompt_eval_count,
            chat_response.eval_count
        );

        let text = chat_response.message.content;
        let result = if chat_response.prompt_eval_count > 0 || chat_response.eval_count > 0 {
            GenerationResult::with_usage(
                text,
                TokenUsage::new(chat_response.prompt_eval_count, chat_response.eval_count),
            )
        } else {
            GenerationResult::text(text)
        };

        Ok(result)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
