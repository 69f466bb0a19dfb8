//! Configuration structures.
//!
//! Configuration is loaded from environment variables. The two API
//! credentials are required and startup fails without them; everything else
//! has documented defaults.

use std::env;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::errors::{Error, Result};

/// Default Congress.gov base URL (API v3).
pub const DEFAULT_CONGRESS_BASE_URL: &str = "https://api.congress.gov/v3";

/// Default GovInfo.gov base URL.
pub const DEFAULT_GOVINFO_BASE_URL: &str = "https://api.govinfo.gov";

/// Global configuration: one block per upstream.
#[derive(Debug, Clone)]
pub struct Config {
    /// Congress.gov access settings.
    pub congress: UpstreamConfig,

    /// GovInfo.gov access settings.
    pub govinfo: UpstreamConfig,
}

/// Access settings for a single upstream host.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Short label used in logs and error messages ("congress.gov").
    pub label: String,

    /// Base URL without a trailing slash.
    pub base_url: String,

    /// API key, sent as the `api_key` query parameter. Never logged.
    pub api_key: SecretString,

    /// User-Agent header value.
    pub user_agent: String,

    /// Outbound call spacing.
    pub rate_limit: RateLimitConfig,

    /// Retry behavior for transient failures.
    pub retry: RetryConfig,

    /// Deadline for JSON requests.
    pub request_timeout: Duration,

    /// Deadline for binary package downloads.
    pub download_timeout: Duration,
}

/// Token bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Time to mint one token. One call per interval at steady state.
    #[serde(with = "humantime_serde")]
    pub min_interval: Duration,

    /// Tokens available before the first wait.
    pub burst_capacity: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(100),
            burst_capacity: 1,
        }
    }
}

/// Retry settings for transient upstream failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first (1 = no retries).
    pub max_attempts: u32,

    /// Delay before the first retry; doubles per attempt.
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,

    /// Ceiling on the backoff delay.
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `CONGRESS_API_KEY`, `GOVINFO_API_KEY`.
    ///
    /// Optional overrides: `CONGRESS_API_URL`, `GOVINFO_API_URL`,
    /// `OPENDISCOURSE_RATE_LIMIT_MS`, `OPENDISCOURSE_RATE_BURST`,
    /// `OPENDISCOURSE_REQUEST_TIMEOUT_SECS`,
    /// `OPENDISCOURSE_DOWNLOAD_TIMEOUT_SECS`, `OPENDISCOURSE_MAX_RETRIES`,
    /// `OPENDISCOURSE_RETRY_BASE_MS`.
    pub fn from_env() -> Result<Self> {
        let congress_key = required_env("CONGRESS_API_KEY")?;
        let govinfo_key = required_env("GOVINFO_API_KEY")?;

        let rate_limit = RateLimitConfig {
            min_interval: Duration::from_millis(parse_env("OPENDISCOURSE_RATE_LIMIT_MS", 100)?),
            burst_capacity: parse_env("OPENDISCOURSE_RATE_BURST", 1)?,
        };
        let retry = RetryConfig {
            max_attempts: parse_env("OPENDISCOURSE_MAX_RETRIES", 3)?,
            base_delay: Duration::from_millis(parse_env("OPENDISCOURSE_RETRY_BASE_MS", 1_000)?),
            ..RetryConfig::default()
        };
        let request_timeout =
            Duration::from_secs(parse_env("OPENDISCOURSE_REQUEST_TIMEOUT_SECS", 30)?);
        let download_timeout =
            Duration::from_secs(parse_env("OPENDISCOURSE_DOWNLOAD_TIMEOUT_SECS", 60)?);
        let user_agent = format!("OpenDiscourse-MCP/{}", env!("CARGO_PKG_VERSION"));

        Ok(Self {
            congress: UpstreamConfig {
                label: "congress.gov".to_string(),
                base_url: env::var("CONGRESS_API_URL")
                    .unwrap_or_else(|_| DEFAULT_CONGRESS_BASE_URL.to_string()),
                api_key: SecretString::from(congress_key),
                user_agent: user_agent.clone(),
                rate_limit: rate_limit.clone(),
                retry: retry.clone(),
                request_timeout,
                download_timeout,
            },
            govinfo: UpstreamConfig {
                label: "govinfo.gov".to_string(),
                base_url: env::var("GOVINFO_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GOVINFO_BASE_URL.to_string()),
                api_key: SecretString::from(govinfo_key),
                user_agent,
                rate_limit,
                retry,
                request_timeout,
                download_timeout,
            },
        })
    }
}

impl UpstreamConfig {
    /// Settings pointing at a test server, with near-zero pacing.
    ///
    /// Keeps integration tests fast without changing production defaults.
    pub fn for_tests(label: &str, base_url: impl Into<String>, api_key: &str) -> Self {
        Self {
            label: label.to_string(),
            base_url: base_url.into(),
            api_key: SecretString::from(api_key.to_string()),
            user_agent: format!("OpenDiscourse-MCP/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: RateLimitConfig {
                min_interval: Duration::from_millis(1),
                burst_capacity: 1,
            },
            retry: RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(10),
            },
            request_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(5),
        }
    }
}

fn required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(format!("{} is not set", key))),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::config(format!("{} has invalid value {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}
