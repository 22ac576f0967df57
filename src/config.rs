//! Backend connection settings
//!
//! Settings come from the environment and can be overridden per invocation.

use reqwest::Url;
use std::env;
use std::time::Duration;

use crate::{ExoscopeError, Result};

/// Environment variable selecting the backend origin
pub const API_URL_VAR: &str = "EXOSCOPE_API_URL";
/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_VAR: &str = "EXOSCOPE_TIMEOUT_SECS";
/// Local development backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend origin, without a trailing slash
    pub api_base_url: Url,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default backend URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// An unset or blank base URL selects the local development backend.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var(API_URL_VAR) {
            if !url.trim().is_empty() {
                config = config.with_api_url(&url)?;
            }
        }

        if let Ok(secs) = env::var(TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ExoscopeError::Config(format!("{} must be whole seconds, got {:?}", TIMEOUT_VAR, secs))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the backend origin; trailing slashes are dropped
    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL as text, for messages
    pub fn api_base(&self) -> &str {
        self.api_base_url.as_str().trim_end_matches('/')
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ExoscopeError::Config(format!("invalid backend URL {:?}: {}", raw, e)))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ExoscopeError::Config(format!(
            "backend URL must be an http(s) origin, got {:?}",
            raw
        )));
    }

    Ok(url)
}
