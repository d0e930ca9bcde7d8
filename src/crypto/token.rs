use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::models::session::SessionPayload;

/// The fixed signing algorithm for session tokens.
pub const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// Wire claims of a session token.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims {
    user_id: String,
    email: String,
    expires_at: DateTime<Utc>,
    /// Issued-at (seconds since epoch)
    iat: i64,
    /// Expiry (seconds since epoch)
    exp: i64,
}

/// Why a token was not accepted. Only ever logged, never shown to callers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("token signature has expired")]
    Expired,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token is malformed or its claims do not decode")]
    Malformed,
    #[error("session payload has expired")]
    PayloadExpired,
}

/// Signs and verifies session tokens with a symmetric key.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs `payload` with `iat = issued_at` and `exp = payload.expires_at`.
    pub fn sign(&self, payload: &SessionPayload, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            user_id: payload.user_id().to_string(),
            email: payload.email().to_string(),
            expires_at: payload.expires_at(),
            iat: issued_at.timestamp(),
            exp: payload.expires_at().timestamp(),
        };

        Ok(encode(&Header::new(SESSION_ALGORITHM), &claims, &self.encoding)?)
    }

    /// Verifies signature and `exp`, then checks `expiresAt` against `now`.
    pub fn verify(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<SessionPayload, TokenRejection> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            })?;

        let payload = SessionPayload::new(claims.user_id, claims.email, claims.expires_at);
        if payload.is_expired_at(now) {
            return Err(TokenRejection::PayloadExpired);
        }

        Ok(payload)
    }
}
