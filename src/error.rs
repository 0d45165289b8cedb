//! Error types shared by the tokenizer, the supervisor and the config loader.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A command line that cannot be turned into a runnable pipeline.
///
/// Returned before any process is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A segment between two `|` (or at either end of the line) holds no tokens.
    #[error("empty stage {index} in pipeline")]
    EmptyStage { index: usize },

    #[error("too many pipeline stages: {count} (at most {max})")]
    TooManyStages { count: usize, max: usize },
}

/// The process-creation primitive itself failed.
///
/// A program that cannot be located is not a `SpawnError`; see
/// [`crate::supervisor::ProcessHandle`].
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The directory children are started in has disappeared.
    #[error("working directory {} is not accessible", path.display())]
    WorkingDirectory { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("syntax error in configuration file {} at line {line}", path.display())]
    Syntax { path: PathBuf, line: usize },

    #[error("invalid InputSize value {value:?} in {}", path.display())]
    InvalidInputSize { path: PathBuf, value: String },

    #[error("too many startup commands (at most {max}), ignoring {command:?}")]
    TooManyStartupCommands { command: String, max: usize },
}

impl ConfigError {
    /// Status text written to the command log for this problem.
    pub fn log_status(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "failed to open configuration file",
            ConfigError::Syntax { .. } => "syntax error in configuration file",
            ConfigError::InvalidInputSize { .. } => "invalid InputSize value",
            ConfigError::TooManyStartupCommands { .. } => "too many startup commands",
        }
    }
}
