//! Error types for the CLI application.
//!
//! Every command returns `Result<(), CliError>`; [`CliError::exit_code`]
//! turns a failure into the process exit status.

use lounge_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or command-line arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine refused an operation or broke an invariant
    #[error("Engine error: {0}")]
    Engine(#[from] GameError),

    /// A simulated hand did not conserve chips
    #[error("Conservation violated in {hand_id}: deltas sum to {sum}")]
    Conservation { hand_id: String, sum: i64 },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
