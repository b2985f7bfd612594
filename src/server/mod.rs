//! HTTP server — axum router over the chat dispatcher and contact relay.
//!
//! ## URL layout
//!
//! ```text
//! POST /chat     — {message, business_id?} → {reply}
//! POST /contact  — {business_name, email?, phone?, message?} → {message}
//! GET  /health   — liveness probe
//! ```
//!
//! State is an immutable snapshot built once in `main` and injected via
//! [`axum::extract::State`]; request handlers share nothing mutable.
//! `run()` drives the server until the [`CancellationToken`] fires, wired
//! to axum's graceful shutdown.

mod api;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::contact::Mailer;
use crate::error::AppError;
use crate::llm::LlmProvider;
use crate::store::BusinessStore;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler.
///
/// Cheap to clone — the store is reference-counted and both backends are
/// internally shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BusinessStore>,
    pub provider: LlmProvider,
    pub mailer: Mailer,
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn run(addr: &str, state: AppState, shutdown: CancellationToken) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("http server shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the full application router. Public so integration tests can drive
/// it without opening a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(api::chat).options(api::preflight))
        .route("/contact", post(api::contact).options(api::preflight))
        .route("/health", get(api::health))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

/// The original service sits behind embedded website widgets, so every
/// response carries a permissive CORS header.
async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
