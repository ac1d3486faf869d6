//! Error types for Palaver
//!
//! This module defines all error types used throughout the harness,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Palaver operations
///
/// This enum encompasses all possible errors that can occur while
/// driving a conversation: malformed turns, backend failures, misuse
/// of the runner, and configuration problems.
#[derive(Error, Debug)]
pub enum PalaverError {
    /// Malformed turn input (unrecognized role or empty content).
    /// A local precondition violation, never silently corrected.
    #[error("Invalid turn: {0}")]
    InvalidTurn(String),

    /// The generation call failed (network, auth, quota, malformed
    /// backend response). Always surfaced to the caller, never retried
    /// automatically by the harness.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Overlapping `submit_user_turn` calls on the same conversation
    #[error("Concurrent submission rejected: {0}")]
    ConcurrentSubmission(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Palaver operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to distinguish error kinds can `downcast_ref::<PalaverError>()`.
pub type Result<T> = anyhow::Result<T>;
