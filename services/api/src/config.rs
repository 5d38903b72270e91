use std::time::Duration;

use moviewatch_auth_types::expiry::parse_expires_in;
use moviewatch_core::config::{ConfigError, flag, parsed_or, process_env, required};

/// API configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Token lifetime (default 15m). Env var: `JWT_EXPIRES_IN`, e.g. `900`, `15m`, `1d`.
    pub jwt_expires_in: Duration,
    /// TCP port for the HTTP server (default 3000). Env var: `PORT`.
    pub port: u16,
    /// Apply pending migrations before serving (default false). Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(15 * 60);

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_expires_in = match lookup("JWT_EXPIRES_IN").filter(|v| !v.trim().is_empty()) {
            None => DEFAULT_EXPIRES_IN,
            Some(raw) => parse_expires_in(&raw).map_err(|e| ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                reason: e.to_string(),
            })?,
        };
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            jwt_expires_in,
            port: parsed_or(&lookup, "PORT", 3000)?,
            run_migrations: flag(&lookup, "RUN_MIGRATIONS"),
        })
    }
}
