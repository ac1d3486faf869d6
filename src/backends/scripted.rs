//! Scripted backend for deterministic, offline runs
//!
//! This backend replays a fixed queue of canned replies instead of calling a
//! real model. It records every request it receives, which lets tests assert
//! that the full, ordered history reached the backend on each call. The
//! `check` command uses it to exercise the whole harness with no network.

use crate::error::{PalaverError, Result};
use crate::backends::{GenerationBackend, GenerationRequest, GenerationResult};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One canned reply in a script
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text as the generated completion
    Text(String),
    /// Fail the generation call with a backend error carrying this message
    Failure(String),
}

/// Deterministic backend that replays scripted replies in order
///
/// # Examples
///
/// ```
/// use palaver::backends::scripted::ScriptedBackend;
/// use palaver::backends::{GenerationBackend, GenerationOptions, GenerationRequest};
/// use palaver::store::Turn;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> palaver::error::Result<()> {
/// let backend = ScriptedBackend::new().with_text("Nice to meet you, Helen.");
/// let request = GenerationRequest::new(
///     "scripted",
///     vec![Turn::user("My name is Helen.")],
///     GenerationOptions::new(),
/// );
/// let result = backend.generate(&request).await?;
/// assert_eq!(result.text, "Nice to meet you, Helen.");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    latency: Option<Duration>,
}

impl ScriptedBackend {
    /// Creates a backend with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend from a list of reply texts
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::backends::scripted::ScriptedBackend;
    ///
    /// let backend = ScriptedBackend::from_texts(vec![
    ///     "first reply".to_string(),
    ///     "second reply".to_string(),
    /// ]);
    /// assert_eq!(backend.remaining(), 2);
    /// ```
    pub fn from_texts(texts: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(texts.into_iter().map(ScriptedReply::Text).collect()),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Queues a text reply and returns self for builder-style chaining
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(ScriptedReply::Text(text.into()));
        self
    }

    /// Queues a failure and returns self for builder-style chaining
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::Failure(message.into()));
        self
    }

    /// Adds an artificial delay before each reply
    ///
    /// Used by tests to hold a submission in flight long enough to observe
    /// the runner's concurrency guard.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Appends a reply to the end of the script
    pub fn push(&self, reply: ScriptedReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Number of replies still queued
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Every request received so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.requests
            .lock()
            .map_err(|_| {
                PalaverError::Backend("Failed to acquire lock on request log".to_string())
            })?
            .push(request.clone());

        let reply = self
            .replies
            .lock()
            .map_err(|_| PalaverError::Backend("Failed to acquire lock on script".to_string()))?
            .pop_front();

        tracing::debug!(
            request_id = %request.id,
            "Scripted backend serving reply for {} turns",
            request.turns.len()
        );

        match reply {
            Some(ScriptedReply::Text(text)) => Ok(GenerationResult::text(text)),
            Some(ScriptedReply::Failure(message)) => {
                Err(PalaverError::Backend(message).into())
            }
            None => Err(PalaverError::Backend(
                "Scripted backend has no replies left".to_string(),
            )
            .into()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
