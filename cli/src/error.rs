//! Application-level error type shared by the CLI and the HTTP trigger.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use commander_core::{ConfigError, PipelineError};
use commander_scripts::DiscoveryError;
use commander_sqlite::SqliteError;
use serde_json::json;

/// Errors raised while assembling or running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scripts could not be discovered at startup.
    #[error("script discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The database could not be opened.
    #[error(transparent)]
    Sqlite(#[from] SqliteError),

    /// A pipeline run failed and was rolled back.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Another run is in progress.
    #[error("a run is already in progress")]
    Busy,

    /// Anything else, such as a panicked worker task.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for application results.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Pipeline(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "command": err.command(),
                    "error": err.to_string(),
                }),
            ),
            AppError::Busy => (StatusCode::CONFLICT, json!({ "error": self.to_string() })),
            _ => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
