use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::session::SessionPayload,
    state::AppState,
    validation::auth::*,
};

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Issues a session for an already-identified user. Development only.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Response> {
    validate_create_session(&payload)?;
    tracing::info!("🔐 Session request for user: {}", payload.user_id);

    state
        .sessions
        .create(&cookies, &payload.user_id, &payload.email)?;

    let response = AuthResponse {
        success: true,
        message: "Session created".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Returns the current session, if any.
#[axum::debug_handler]
pub async fn current_session(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<SessionPayload>> {
    state
        .sessions
        .read(&cookies)
        .map(Json)
        .ok_or_else(|| AppError::Authentication("No valid session".to_string()))
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    state.sessions.delete(&cookies);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Returns the identity attached by the session middleware.
#[axum::debug_handler]
pub async fn me(Extension(session): Extension<SessionPayload>) -> Json<SessionPayload> {
    tracing::debug!("👤 Profile lookup for user: {}", session.user_id());
    Json(session)
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
