//! Base backend trait and common types for Palaver
//!
//! This module defines the GenerationBackend trait that all text-generation
//! backends must implement, along with the request/response structures that
//! cross the harness/backend boundary.

use crate::error::Result;
use crate::store::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Backend-interpreted configuration options
///
/// A flat map of option keys to JSON values. Recognized keys are documented
/// by each backend; unrecognized keys are passed through opaquely and never
/// validated by the harness.
///
/// # Examples
///
/// ```
/// use palaver::backends::GenerationOptions;
///
/// let options = GenerationOptions::new()
///     .with_option("temperature", serde_json::json!(0.2));
/// assert!(options.get("temperature").is_some());
/// assert!(options.get("top_p").is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Option entries, forwarded to the backend as-is
    #[serde(flatten)]
    pub entries: HashMap<String, serde_json::Value>,
}

impl GenerationOptions {
    /// Creates an empty options map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option and returns self for builder-style chaining
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Looks up an option by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Returns true if no options are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One generation call's input
///
/// Carries the full history snapshot taken at submission time plus the
/// backend-selection parameters. A request is owned solely by the call that
/// creates it and is discarded once the response is obtained.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Unique identifier for this request, used in log correlation
    pub id: Uuid,
    /// Model identifier, free-form and backend-interpreted
    pub model: String,
    /// Ordered history snapshot: all prior committed turns plus the new
    /// user turn, none dropped, none reordered
    pub turns: Vec<Turn>,
    /// Backend-interpreted options
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Creates a new request with a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::backends::{GenerationOptions, GenerationRequest};
    /// use palaver::store::Turn;
    ///
    /// let request = GenerationRequest::new(
    ///     "llama3.2:latest",
    ///     vec![Turn::user("Hello")],
    ///     GenerationOptions::new(),
    /// );
    /// assert_eq!(request.turns.len(), 1);
    /// ```
    pub fn new(model: impl Into<String>, turns: Vec<Turn>, options: GenerationOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            turns,
            options,
        }
    }
}

/// Token usage reported by a backend for one completion
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::backends::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// One generation call's output
///
/// Produced by a backend and consumed immediately: the harness appends the
/// text back into history and hands the result to the caller.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The generated text
    pub text: String,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
    /// Backend-specific structured metadata
    pub metadata: Option<serde_json::Value>,
}

impl GenerationResult {
    /// Creates a result carrying only text
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::backends::GenerationResult;
    ///
    /// let result = GenerationResult::text("Nice to meet you, Helen.");
    /// assert!(result.usage.is_none());
    /// ```
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            metadata: None,
        }
    }

    /// Creates a result with token usage attached
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
            metadata: None,
        }
    }
}

/// Capability required from a text-generation backend
///
/// A backend accepts an ordered turn sequence plus a model identifier and
/// configuration options, and returns generated text or fails with a
/// `PalaverError::Backend`. The harness performs no retries and no error
/// suppression; timeouts are the backend's contract to expose and the
/// harness's contract to propagate.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use palaver::backends::{GenerationBackend, GenerationRequest, GenerationResult};
/// use palaver::error::Result;
///
/// struct EchoBackend;
///
/// #[async_trait]
/// impl GenerationBackend for EchoBackend {
///     async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
///         let last = request.turns.last().map(|t| t.content.clone()).unwrap_or_default();
///         Ok(GenerationResult::text(last))
///     }
///
///     fn name(&self) -> &str {
///         "echo"
///     }
/// }
/// ```
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generates a completion for the given request
    ///
    /// # Errors
    ///
    /// Returns an error if the generation call fails or the backend's
    /// response is malformed.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Short identifier for this backend, used in logs and reports
    fn name(&self) -> &str;
}
