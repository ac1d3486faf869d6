//! Command-line interface definition for Palaver
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the conversation check against a
//! configured backend and for a fully offline self-check.

use clap::{Parser, Subcommand};

/// Palaver - conversation-state harness
///
/// Drives a text-generation backend through a multi-turn conversation and
/// verifies that information stated early is still retrievable several
/// turns later.
#[derive(Parser, Debug, Clone)]
#[command(name = "palaver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Palaver
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the memory-retention conversation against the configured backend
    Run {
        /// Override the backend from config (ollama, scripted)
        #[arg(short, long)]
        backend: Option<String>,

        /// Override the model identifier from config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run the memory-retention conversation against the built-in scripted
    /// backend, with no network
    Check,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["palaver", "check"]);
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.config, "config/config.yaml");
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::parse_from([
            "palaver",
            "--config",
            "custom.yaml",
            "run",
            "--backend",
            "ollama",
            "--model",
            "mistral:latest",
        ]);
        assert_eq!(cli.config, "custom.yaml");
        match cli.command {
            Commands::Run { backend, model } => {
                assert_eq!(backend.as_deref(), Some("ollama"));
                assert_eq!(model.as_deref(), Some("mistral:latest"));
            }
            _ => panic!("expected run command"),
        }
    }
}
