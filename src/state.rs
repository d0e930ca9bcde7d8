use std::sync::Arc;
use crate::config::Config;
use crate::error::Result;
use crate::session::manager::SessionManager;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Issues and verifies session cookies.
    pub sessions: SessionManager,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`, or a configuration error when
    /// the config must not be served.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        if config.session_secret.is_development_default() {
            tracing::warn!("⚠️ JWT_SECRET not set, using the development secret");
        }

        let sessions = SessionManager::new(config)?;
        tracing::info!(
            "✅ SessionManager initialized (secure cookies: {}, duration: {} days)",
            config.app_env.is_production(),
            config.session_duration_days
        );

        Ok(AppState {
            config: Arc::new(config.clone()),
            sessions,
        })
    }
}
