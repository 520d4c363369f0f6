//! HTTP trigger: `POST /execute` runs the pipeline once.
//!
//! At most one run is in flight. A trigger that arrives while a run is
//! executing is answered with `409 Conflict` instead of queueing behind it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, TryLockError};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::app::Runner;
use crate::error::{AppError, AppResult};

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    runner: Arc<Mutex<Runner>>,
}

impl AppState {
    /// Wraps a runner for use by the router.
    pub fn new(runner: Runner) -> Self {
        Self {
            runner: Arc::new(Mutex::new(runner)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn execute(State(state): State<AppState>) -> AppResult<StatusCode> {
    let runner = Arc::clone(&state.runner);
    tokio::task::spawn_blocking(move || {
        let mut runner = match runner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(AppError::Busy),
            // A panicked run leaves no transaction open; keep serving.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        runner.run()
    })
    .await
    .map_err(|e| AppError::Internal(format!("run task failed: {e}")))??;

    Ok(StatusCode::NO_CONTENT)
}

/// Builds the router with the trigger and health endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/execute", post(execute))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
