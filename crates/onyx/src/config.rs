//! Onyx connection settings.

use std::time::Duration;
use crate::error::{OnyxError, Result};

/// Environment variable holding the Onyx base URL.
pub const DOMAIN_ENV: &str = "ONYX_DOMAIN";

/// Environment variable holding the Onyx API token.
pub const TOKEN_ENV: &str = "ONYX_TOKEN";

/// Connection settings for the Onyx API.
#[derive(Clone)]
pub struct OnyxConfig {
    /// Base URL, e.g. `https://onyx.climb.ac.uk`
    pub domain: String,

    /// API token
    pub token: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Attempts per request when the connection fails
    pub max_attempts: u32,

    /// Pause between attempts
    pub retry_delay: Duration,
}

impl OnyxConfig {
    /// Create settings with default timeout and retry policy.
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Read domain and token from `ONYX_DOMAIN` / `ONYX_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read domain and token through a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OnyxError::Config {
                    message: format!("{} is not set", key),
                })
        };
        Ok(Self::new(read(DOMAIN_ENV)?, read(TOKEN_ENV)?))
    }

    /// Set the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of attempts per request (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

impl std::fmt::Debug for OnyxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnyxConfig")
            .field("domain", &self.domain)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
