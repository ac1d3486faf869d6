//! Conversation orchestration
//!
//! This module implements the runner that drives a conversation: it owns a
//! single message store, submits the full history plus each new user turn to
//! a bound backend, and appends the backend's reply back into history.
//!
//! The runner allows one in-flight submission at a time. Two concurrent
//! submissions would race on "snapshot before append" and could send a
//! request that leaves out the previous reply, or append replies out of
//! order, so an overlapping call is rejected with
//! `PalaverError::ConcurrentSubmission` instead.

use crate::error::{PalaverError, Result};
use crate::backends::{GenerationBackend, GenerationOptions, GenerationRequest, GenerationResult};
use crate::store::{MessageStore, Turn};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Resets the in-flight flag when a submission ends on any path,
/// including cancellation of the in-flight future.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one conversation against a bound generation backend
///
/// The runner owns its [`MessageStore`] exclusively; no shared mutable
/// state crosses conversation instances. History lives in memory for the
/// duration of one run.
///
/// # Failure policy
///
/// When the backend fails, the user turn stays committed and the error
/// propagates: a failed generation should not erase the fact that the user
/// asked something, so a retry can reuse the same history. A cancelled
/// submission likewise keeps the user turn and appends no assistant turn.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use palaver::backends::{GenerationOptions, ScriptedBackend};
/// use palaver::runner::ConversationRunner;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> palaver::error::Result<()> {
/// let backend = Arc::new(ScriptedBackend::new().with_text("Hi there!"));
/// let runner = ConversationRunner::new(backend, "scripted", GenerationOptions::new());
///
/// let result = runner.submit_user_turn("Hello").await?;
/// assert_eq!(result.text, "Hi there!");
/// assert_eq!(runner.history()?.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ConversationRunner {
    backend: Arc<dyn GenerationBackend>,
    model: String,
    options: GenerationOptions,
    store: Mutex<MessageStore>,
    in_flight: AtomicBool,
}

impl ConversationRunner {
    /// Creates a runner bound to a backend, model identifier, and options
    ///
    /// The model identifier is a free-form string interpreted by the
    /// backend; options are passed through to the backend opaquely.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        model: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            options,
            store: Mutex::new(MessageStore::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submits a user turn and returns the backend's reply
    ///
    /// Appends a user turn with `content`, builds a request from the full
    /// history snapshot (all prior turns, none dropped, none reordered),
    /// invokes the backend, and on success appends the reply as an
    /// assistant turn.
    ///
    /// # Errors
    ///
    /// * `PalaverError::ConcurrentSubmission` if another submission is in
    ///   flight on this runner; history is untouched.
    /// * `PalaverError::InvalidTurn` if `content` is empty; history is
    ///   untouched.
    /// * `PalaverError::Backend` if the generation call fails or returns an
    ///   empty completion; the user turn remains committed.
    pub async fn submit_user_turn(&self, content: impl Into<String>) -> Result<GenerationResult> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(PalaverError::ConcurrentSubmission(
                "a submission is already in flight on this conversation".to_string(),
            )
            .into());
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = {
            let mut store = self.lock_store()?;
            store.append(Turn::user(content))?;
            GenerationRequest::new(self.model.clone(), store.snapshot(), self.options.clone())
        };

        tracing::debug!(
            request_id = %request.id,
            backend = self.backend.name(),
            model = %self.model,
            "Submitting user turn with {} turns of context",
            request.turns.len()
        );

        // On failure the user turn stays committed; the caller may retry
        // with the same history.
        let result = self.backend.generate(&request).await?;

        if result.text.trim().is_empty() {
            return Err(PalaverError::Backend(
                "backend returned an empty completion".to_string(),
            )
            .into());
        }

        {
            let mut store = self.lock_store()?;
            store.append(Turn::assistant(result.text.clone()))?;
        }

        tracing::debug!(
            request_id = %request.id,
            "Assistant turn committed ({} chars)",
            result.text.len()
        );

        Ok(result)
    }

    /// Seeds a system turn into the history
    ///
    /// Used to install a system prompt before the first submission. Subject
    /// to the same validation and single-submission rules as user turns.
    ///
    /// # Errors
    ///
    /// Returns `PalaverError::InvalidTurn` for empty content and
    /// `PalaverError::ConcurrentSubmission` while a submission is in flight.
    pub fn push_system_turn(&self, content: impl Into<String>) -> Result<()> {
        if self.in_flight.load(Ordering::Acquire) {
            return Err(PalaverError::ConcurrentSubmission(
                "cannot append a system turn while a submission is in flight".to_string(),
            )
            .into());
        }

        let mut store = self.lock_store()?;
        store.append(Turn::system(content))
    }

    /// Returns a snapshot of the full conversation history
    pub fn history(&self) -> Result<Vec<Turn>> {
        Ok(self.lock_store()?.snapshot())
    }

    /// The bound model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The bound backend's name
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, MessageStore>> {
        self.store.lock().map_err(|_| {
            PalaverError::Backend("Failed to acquire lock on message store".to_string()).into()
        })
    }
}
