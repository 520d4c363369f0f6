//! Error types for script discovery.

use std::path::PathBuf;

use commander_core::CommandError;
use thiserror::Error;

/// Errors that can occur while listing or reading scripts.
///
/// Any of these fails the whole discovery call; no partial result is
/// returned.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The configured external directory does not exist.
    #[error("script location does not exist: {}", .0.display())]
    MissingLocation(PathBuf),

    /// A source could not be enumerated.
    #[error("failed to list scripts in {location}: {source}")]
    ListFailed {
        /// Source label or directory.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A script could not be read as UTF-8 text.
    #[error("failed to read script {location}: {source}")]
    ReadFailed {
        /// Full location of the script.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<DiscoveryError> for CommandError {
    fn from(err: DiscoveryError) -> Self {
        CommandError::Discovery(Box::new(err))
    }
}

/// Convenience alias for results with [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;
