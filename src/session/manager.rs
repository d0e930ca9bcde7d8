use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tower_cookies::cookie::{time::OffsetDateTime, SameSite};

use crate::config::Config;
use crate::crypto::token::{TokenCodec, TokenRejection};
use crate::error::{AppError, Result};
use crate::models::session::SessionPayload;
use crate::session::cookies::{CookieAttributes, CookieStore, RequestCookies};

/// The name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "auth-token";

/// Outcome of looking up a session token.
///
/// The public read paths collapse everything but `Valid` into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Valid(SessionPayload),
    Absent,
    Invalid(TokenRejection),
}

impl SessionLookup {
    pub fn into_payload(self) -> Option<SessionPayload> {
        match self {
            SessionLookup::Valid(payload) => Some(payload),
            SessionLookup::Absent | SessionLookup::Invalid(_) => None,
        }
    }
}

struct Inner {
    codec: TokenCodec,
    secure_cookies: bool,
    session_duration: Duration,
}

/// Issues, reads and clears stateless signed session cookies.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Creates a `SessionManager` from the application configuration.
    ///
    /// Fails when the session duration does not fit a `TimeDelta`.
    pub fn new(config: &Config) -> Result<Self> {
        let session_duration = Duration::try_days(config.session_duration_days).ok_or_else(|| {
            AppError::Configuration(format!(
                "Session duration of {} days is out of range",
                config.session_duration_days
            ))
        })?;

        Ok(Self::with_settings(
            config.session_secret.as_bytes(),
            config.app_env.is_production(),
            session_duration,
        ))
    }

    pub fn with_settings(secret: &[u8], secure_cookies: bool, session_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                codec: TokenCodec::new(secret),
                secure_cookies,
                session_duration,
            }),
        }
    }

    /// Signs a new session for `user_id` and writes it to the session cookie,
    /// replacing any previous token.
    pub fn create(&self, cookies: &impl CookieStore, user_id: &str, email: &str) -> Result<()> {
        self.create_at(cookies, user_id, email, Utc::now())
    }

    /// Same as [`SessionManager::create`] with an explicit issue time.
    pub fn create_at(
        &self,
        cookies: &impl CookieStore,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let expires_at = now
            .checked_add_signed(self.inner.session_duration)
            .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?;
        let payload = SessionPayload::new(user_id.to_string(), email.to_string(), expires_at);

        let token = self.inner.codec.sign(&payload, now)?;

        let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
            .map_err(|e| AppError::Internal(format!("Cookie expiry out of range: {}", e)))?;

        let attributes = CookieAttributes {
            http_only: true,
            secure: self.inner.secure_cookies,
            same_site: SameSite::Lax,
            path: "/",
            expires,
        };

        cookies.set(SESSION_COOKIE, token, &attributes);
        tracing::info!("✅ Session created for user: {} (expires {})", user_id, expires_at);

        Ok(())
    }

    /// Returns the verified session from the cookie store, or `None`.
    pub fn read(&self, cookies: &impl CookieStore) -> Option<SessionPayload> {
        self.inspect(cookies.get(SESSION_COOKIE).as_deref())
            .into_payload()
    }

    /// Returns the verified session from the cookies sent with `request`, or `None`.
    pub fn verify_from_request(&self, request: &impl RequestCookies) -> Option<SessionPayload> {
        self.inspect(request.cookie(SESSION_COOKIE).as_deref())
            .into_payload()
    }

    /// Classifies a raw cookie value without collapsing the failure cause.
    pub fn inspect(&self, token: Option<&str>) -> SessionLookup {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::debug!("No session cookie present");
                return SessionLookup::Absent;
            }
        };

        match self.inner.codec.verify(token, Utc::now()) {
            Ok(payload) => SessionLookup::Valid(payload),
            Err(rejection) => {
                tracing::debug!("❌ Session token rejected: {}", rejection);
                SessionLookup::Invalid(rejection)
            }
        }
    }

    /// Clears the session cookie, whether or not the request carried one.
    pub fn delete(&self, cookies: &impl CookieStore) {
        cookies.delete(SESSION_COOKIE);
        tracing::info!("👋 Session cookie cleared");
    }
}
