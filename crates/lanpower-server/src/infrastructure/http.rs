//! HTTP façade: the axum router, its three handlers, and the listener.
//!
//! # Routes
//!
//! | Method & path      | Success                        | Failure                           |
//! |--------------------|--------------------------------|-----------------------------------|
//! | `GET /api/status`  | 200 `{"ok":true,"online":b}`   | never fails                       |
//! | `POST /api/wake`   | 200 `{"ok":true}`              | 500 `{"ok":false,"error":"..."}`  |
//! | `POST /api/sleep`  | 200 `{"ok":true}`              | 500 `{"ok":false,"error":"..."}`  |
//!
//! Any other path is served from `static_dir` when one is configured, and is
//! a 404 otherwise.
//!
//! # Detached use cases
//!
//! Each handler runs its use case on a separate Tokio task and awaits the
//! join handle.  If the client disconnects, axum drops the handler future but
//! the task keeps going: a sleep command that has already been sent still
//! completes, and its outcome is still logged.
//!
//! Every request emits exactly one structured event when the use case
//! finishes (`wake_sent`, `wake_failed`, `sleep_sent`, `sleep_failed`,
//! `status_checked`), in addition to the access log produced by
//! [`TraceLayer`].

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::application::power_service::PowerService;
use crate::domain::config::{ConfigError, ServerConfig};
use crate::domain::responses::{ActionResponse, StatusResponse};

type ActionReply = (StatusCode, Json<ActionResponse>);

/// Builds the application router around a shared [`PowerService`].
///
/// The static file fallback is taken from the service's configuration.
pub fn build_router(service: Arc<PowerService>) -> Router {
    let static_dir = service.config().static_dir.clone();

    let router = Router::new()
        .route("/api/status", get(status))
        .route("/api/wake", post(wake))
        .route("/api/sleep", post(sleep));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Checks that the configured `static_dir`, if any, is an existing directory.
///
/// This is the one configuration rule that touches the filesystem, so it
/// lives here rather than in [`crate::domain::config`].
///
/// # Errors
///
/// [`ConfigError::StaticDirNotFound`] if the path is missing or not a directory.
pub fn verify_static_dir(config: &ServerConfig) -> Result<(), ConfigError> {
    match &config.static_dir {
        Some(dir) if !dir.is_dir() => Err(ConfigError::StaticDirNotFound(dir.clone())),
        _ => Ok(()),
    }
}

/// Binds the configured listen address and serves until `shutdown` resolves.
///
/// In-flight requests are allowed to finish once `shutdown` fires.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, missing
/// permission) or if the server fails while running.
pub async fn run_server<F>(service: Arc<PowerService>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = service.config().listen_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;

    let local = listener.local_addr().context("listener has no local address")?;
    info!(addr = %local, "server_listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("server stopped");
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn status(State(service): State<Arc<PowerService>>) -> Json<StatusResponse> {
    let online = detached(async move { check_status(&service).await }, false).await;
    Json(StatusResponse::new(online))
}

async fn wake(State(service): State<Arc<PowerService>>) -> ActionReply {
    detached(async move { wake_target(&service).await }, internal_error()).await
}

async fn sleep(State(service): State<Arc<PowerService>>) -> ActionReply {
    detached(async move { sleep_target(&service).await }, internal_error()).await
}

async fn check_status(service: &PowerService) -> bool {
    let online = service.status().await;
    info!(host = %service.config().ssh.host, online, "status_checked");
    online
}

async fn wake_target(service: &PowerService) -> ActionReply {
    match service.wake().await {
        Ok(mac) => {
            let wake = &service.config().wake;
            info!(mac = %mac, broadcast = %wake.broadcast, port = wake.port, "wake_sent");
            (StatusCode::OK, Json(ActionResponse::success()))
        }
        Err(e) => {
            error!(error = %e, "wake_failed");
            failure(e.to_string())
        }
    }
}

async fn sleep_target(service: &PowerService) -> ActionReply {
    match service.sleep().await {
        Ok(output) => {
            let ssh = &service.config().ssh;
            info!(
                host = %ssh.host,
                port = ssh.port,
                user = %ssh.user,
                stdout = output.stdout.trim(),
                stderr = output.stderr.trim(),
                "sleep_sent"
            );
            (StatusCode::OK, Json(ActionResponse::success()))
        }
        Err(e) => {
            error!(error = %e, "sleep_failed");
            failure(e.to_string())
        }
    }
}

/// Runs `work` on its own task so that dropping the caller does not cancel it.
///
/// `fallback` is returned only if the task panicked.
async fn detached<T, F>(work: F, fallback: T) -> T
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "request task failed");
            fallback
        }
    }
}

fn failure(message: String) -> ActionReply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ActionResponse::failure(message)),
    )
}

fn internal_error() -> ActionReply {
    failure("internal error".to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
