//! Axum handlers and the error-kind → HTTP status boundary.
//!
//! Handlers stay thin: deserialize, call into `chat`/`contact`, translate
//! the result. No business logic lives here.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::chat::{self, ChatError, ChatRequest};
use crate::contact::{ContactError, ContactForm};

use super::AppState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    business_id: Option<String>,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /chat
pub(super) async fn chat(State(state): State<AppState>, Json(body): Json<ChatBody>) -> Response {
    let request = ChatRequest { message: body.message, business_id: body.business_id };

    match chat::handle_chat(&state.store, &state.provider, &request).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        // The oversize error goes back under `reply` — embedded widgets
        // render that field directly, and the original wire contract did
        // the same.
        Err(ChatError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "reply": msg }))).into_response()
        }
        Err(ChatError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown business: {id}") })),
        )
            .into_response(),
        Err(ChatError::Upstream(msg)) => {
            warn!(error = %msg, "chat request failed upstream");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "The assistant is unavailable right now. Please try again later." })),
            )
                .into_response()
        }
    }
}

/// POST /contact
pub(super) async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Response {
    match state.mailer.send_contact(&form).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Contact form submitted successfully" })),
        )
            .into_response(),
        Err(ContactError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        Err(e @ (ContactError::Credentials | ContactError::Send(_))) => {
            warn!(error = %e, "contact relay failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send email" })),
            )
                .into_response()
        }
    }
}

/// GET /health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "businesses": state.store.len() })),
    )
        .into_response()
}

/// OPTIONS preflight for the POST routes — the allow-origin header itself is
/// added by the router-wide layer.
pub(super) async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST, OPTIONS"),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type"),
            ),
        ],
    )
        .into_response()
}
