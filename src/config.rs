use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Secret used when `JWT_SECRET` is not set. Only acceptable outside production.
pub const DEVELOPMENT_SECRET: &str = "development-secret-key";
/// The default lifetime of a session in days.
pub const DEFAULT_SESSION_DAYS: i64 = 7;
/// Longest accepted session lifetime in days.
pub const MAX_SESSION_DAYS: i64 = 3650;

/// The deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

/// Where the token signing secret came from.
#[derive(Clone)]
pub enum SessionSecret {
    /// Read from `JWT_SECRET`.
    Configured(Zeroizing<Vec<u8>>),
    /// Hardcoded fallback for local development.
    DevelopmentDefault,
}

impl SessionSecret {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SessionSecret::Configured(bytes) => bytes.as_slice(),
            SessionSecret::DevelopmentDefault => DEVELOPMENT_SECRET.as_bytes(),
        }
    }

    pub fn is_development_default(&self) -> bool {
        matches!(self, SessionSecret::DevelopmentDefault)
    }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionSecret::Configured(_) => f.write_str("Configured(<redacted>)"),
            SessionSecret::DevelopmentDefault => f.write_str("DevelopmentDefault"),
        }
    }
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Deployment environment, controls the `Secure` cookie flag.
    pub app_env: AppEnv,
    /// The symmetric key used to sign session tokens.
    pub session_secret: SessionSecret,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a `Config` from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let session_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => {
                SessionSecret::Configured(Zeroizing::new(secret.into_bytes()))
            }
            _ => SessionSecret::DevelopmentDefault,
        };

        let session_duration_days: i64 = lookup("SESSION_DURATION_DAYS")
            .unwrap_or_else(|| DEFAULT_SESSION_DAYS.to_string())
            .parse()
            .context("Invalid SESSION_DURATION_DAYS")?;

        if session_duration_days <= 0 {
            anyhow::bail!("SESSION_DURATION_DAYS must be a positive number of days");
        }

        if session_duration_days > MAX_SESSION_DAYS {
            anyhow::bail!("SESSION_DURATION_DAYS must be at most {} days", MAX_SESSION_DAYS);
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 127.0.0.1:3000")?;

        Ok(Self {
            app_env,
            session_secret,
            session_duration_days,
            bind_addr,
        })
    }

    /// Rejects configurations that must never reach a running server.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.app_env.is_production() && self.session_secret.is_development_default() {
            return Err(crate::error::AppError::Configuration(
                "JWT_SECRET must be set when APP_ENV=production".to_string(),
            ));
        }

        if !(1..=MAX_SESSION_DAYS).contains(&self.session_duration_days) {
            return Err(crate::error::AppError::Configuration(format!(
                "Session duration must be between 1 and {} days",
                MAX_SESSION_DAYS
            )));
        }

        Ok(())
    }
}
