//! Palaver - conversation-state harness library
//!
//! This library accumulates a turn-ordered message history, submits that
//! history plus each new user turn to a pluggable generation backend,
//! appends the backend's reply back into history, and lets a caller assert
//! semantic properties on any turn's output.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: the ordered, append-only history of turns for one conversation
//! - `runner`: orchestrates turn submission against a bound backend
//! - `backends`: backend abstraction plus Ollama and scripted implementations
//! - `scenario`: scripted conversation checks with reply expectations
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use palaver::backends::{GenerationOptions, ScriptedBackend};
//! use palaver::runner::ConversationRunner;
//! use palaver::scenario::Scenario;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(
//!         ScriptedBackend::new()
//!             .with_text("Nice to meet you, Helen.")
//!             .with_text("You're a data scientist.")
//!             .with_text("Your name is Helen."),
//!     );
//!     let runner = ConversationRunner::new(backend, "scripted", GenerationOptions::new());
//!
//!     let report = Scenario::memory_retention().run(&runner).await?;
//!     assert!(report.passed());
//!     Ok(())
//! }
//! ```

pub mod backends;
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{PalaverError, Result};
pub use runner::ConversationRunner;
pub use scenario::{Scenario, ScenarioReport};
pub use store::{MessageStore, Role, Turn};

#[cfg(test)]
pub mod test_utils;
