/*
 * Responsibility
 * - Environment/configuration loading (authority endpoint, cache tuning)
 * - Validation of values (startup fails on missing/invalid keys)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::session::cache::{DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    /// Base address of the session authority, e.g. `https://auth.internal/`.
    pub authority_base_url: Url,
    /// Upper bound on a single authority round-trip.
    pub authority_timeout: Duration,

    /// How long a resolved session is trusted without re-verification.
    pub session_ttl: Duration,
    /// Wake interval of the expired-entry sweep.
    pub sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let authority_base_url = std::env::var("AUTHORITY_BASE_URL")
            .map_err(|_| ConfigError::Missing("AUTHORITY_BASE_URL"))?;
        let authority_base_url =
            Url::parse(&authority_base_url).map_err(|_| ConfigError::Invalid("AUTHORITY_BASE_URL"))?;

        let authority_timeout = duration_var("AUTHORITY_TIMEOUT_SECS", Duration::from_secs(5))?;
        let session_ttl = duration_var("SESSION_CACHE_TTL_SECS", DEFAULT_TTL)?;
        let sweep_interval = duration_var("SESSION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL)?;

        Ok(Self {
            addr,
            authority_base_url,
            authority_timeout,
            session_ttl,
            sweep_interval,
        })
    }
}

/// Reads `key` as whole seconds; absent means `default`, garbage is a
/// startup failure rather than a silent fallback.
fn duration_var(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}
