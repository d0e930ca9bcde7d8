//! Stateless signed-cookie sessions for axum services.

use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
};

use http::{Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod session;
}

pub mod session {
    pub mod cookies;
    pub mod manager;
}

pub mod handlers {
    pub mod auth;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}

pub use config::{AppEnv, Config, SessionSecret};
pub use error::{AppError, Result};
pub use models::session::SessionPayload;
pub use session::cookies::{CookieAttributes, CookieStore, MemoryCookieJar, RequestCookies};
pub use session::manager::{SessionLookup, SessionManager, SESSION_COOKIE};
pub use state::AppState;

/// Builds the HTTP router.
///
/// The session-issuing route is only mounted outside production; a real
/// deployment calls [`SessionManager::create`] from its own login flow.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            header::HeaderValue::from_static("http://localhost:3000"),
            header::HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let mut public_routes = Router::new()
        .route("/health", get(handlers::auth::health))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .route("/api/auth/logout", post(handlers::auth::logout));

    if !state.config.app_env.is_production() {
        public_routes =
            public_routes.route("/api/auth/session", post(handlers::auth::create_session));
    }

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
}
