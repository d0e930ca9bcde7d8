use chrono::{DateTime, Utc};
use serde::Serialize;

/// The authenticated identity carried by a session token.
///
/// There is no public constructor and no `Deserialize` impl: a value of this
/// type only comes out of [`crate::crypto::token::TokenCodec::verify`] (or is
/// built internally right before signing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    user_id: String,
    email: String,
    expires_at: DateTime<Utc>,
}

impl SessionPayload {
    pub(crate) fn new(user_id: String, email: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            expires_at,
        }
    }

    /// Stable identifier of the principal.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Informational only, never used for authorization.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Absolute end of validity, checked independently of the token `exp`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
