use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// A middleware that requires a valid session cookie on the incoming request.
///
/// Runs before any handler, so it reads the cookie straight from the request
/// headers and attaches the verified `SessionPayload` as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking session...");

    let Some(session) = state.sessions.verify_from_request(&request) else {
        tracing::warn!("❌ Rejected request to {}: no valid session", request.uri().path());
        return AppError::Authentication("No valid session".to_string()).into_response();
    };

    tracing::debug!("✅ Session valid for user: {}", session.user_id());

    request.extensions_mut().insert(session);

    next.run(request).await
}
