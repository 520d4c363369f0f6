//! Error taxonomy shared by every command and by the pipeline.
//!
//! Executors report [`ExecutionError`], commands report [`CommandError`], and
//! the pipeline wraps whichever command failed first in
//! [`PipelineError::CommandFailed`] so callers always learn the command name.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error used for sources that come from other crates.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A single SQL statement (or transaction control operation) failed.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExecutionError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ExecutionError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error that wraps the underlying driver error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by a [`Command`](crate::Command) while executing.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Script or resource discovery failed before any statement ran.
    #[error("discovery failed: {0}")]
    Discovery(#[source] BoxError),

    /// A statement failed; the rest of the script was not executed.
    #[error("statement {index} of script '{script}' failed: {source}")]
    Statement {
        /// Name of the script that contained the statement.
        script: String,
        /// One-based position of the statement within the script.
        index: usize,
        /// The statement text as sent to the database.
        statement: String,
        /// Underlying database error.
        #[source]
        source: ExecutionError,
    },

    /// Any other command-specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Errors returned by [`Pipeline::execute`](crate::Pipeline::execute).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A command failed; no later command ran and the unit of work rolled back.
    #[error("command '{command}' failed: {source}")]
    CommandFailed {
        /// Name of the failing command.
        command: String,
        /// The command's own error.
        #[source]
        source: CommandError,
    },

    /// The transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(#[source] ExecutionError),
}

impl PipelineError {
    /// Returns the name of the failing command, if a command failed.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { command, .. } => Some(command),
            Self::Transaction(_) => None,
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for the expected layout.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A comma-separated name list contains an empty entry.
    #[error("invalid filter list '{0}': entries must not be empty")]
    InvalidFilter(String),

    /// A script name prefix or suffix contains a path separator or wildcard.
    #[error("invalid script pattern fragment '{0}': must not contain '/', '\\' or '*'")]
    InvalidPattern(String),

    /// The statement delimiter is empty.
    #[error("statement delimiter must not be empty")]
    InvalidDelimiter,
}

/// Convenience alias for results with [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
