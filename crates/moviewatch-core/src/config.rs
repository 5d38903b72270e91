//! Environment lookups for service configuration.
//!
//! Every helper takes a lookup function instead of reading the process
//! environment directly, so config parsing is testable without touching
//! global state. Production passes [`process_env`].

use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("env var {key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Required, non-blank value.
pub fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Optional value parsed with `FromStr`; `default` when unset or blank.
pub fn parsed_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

/// `true`/`1`/`yes` (any case) are truthy; unset is `false`.
pub fn flag<F>(lookup: &F, key: &'static str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
