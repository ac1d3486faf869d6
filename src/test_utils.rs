//! Test utilities for Palaver
//!
//! This module provides common test helpers: scripted runner builders and
//! error assertion helpers.

use crate::backends::{GenerationOptions, ScriptedBackend};
use crate::runner::ConversationRunner;
use std::sync::Arc;

/// Build a runner over a scripted backend serving the given replies
///
/// # Examples
///
/// ```ignore
/// let runner = scripted_runner(vec!["Hi!".to_string()]);
/// ```
pub fn scripted_runner(replies: Vec<String>) -> ConversationRunner {
    ConversationRunner::new(
        Arc::new(ScriptedBackend::from_texts(replies)),
        "scripted",
        GenerationOptions::new(),
    )
}

/// Assert that a result's error chain mentions the expected substring
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected
/// message.
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PalaverError;

    #[tokio::test]
    async fn test_scripted_runner_serves_replies() {
        let runner = scripted_runner(vec!["pong".to_string()]);
        let result = runner.submit_user_turn("ping").await.unwrap();
        assert_eq!(result.text, "pong");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(PalaverError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: crate::error::Result<()> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: crate::error::Result<()> =
            Err(PalaverError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }
}
