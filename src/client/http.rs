//! Shared HTTP transport for the two upstreams.
//!
//! One `Transport` per upstream host owns the reqwest client, the pacing
//! limiter, the retry policy and the credential. Resource methods in the
//! Congress and GovInfo clients reduce to path building plus one call here.
//!
//! The API key rides in the query string, so logs and error text reference
//! only the request path, never the assembled URL.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::client::rate_limit::RateLimiter;
use crate::client::retry::RetryPolicy;
use crate::types::{Error, Result, UpstreamConfig};

/// Longest upstream body fragment quoted in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Rate-limited, retrying GET transport for one upstream.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    label: String,
    base_url: String,
    api_key: SecretString,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    download_timeout: Duration,
}

impl Transport {
    /// Build a transport from upstream config. The limiter is injected so
    /// every clone of this transport shares one bucket.
    pub fn new(config: &UpstreamConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::internal(format!("http client init: {}", e)))?;
        Ok(Self {
            http,
            label: config.label.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            limiter,
            retry: RetryPolicy::new(config.retry.clone()),
            download_timeout: config.download_timeout,
        })
    }

    /// Upstream label used in errors and logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// GET a JSON resource. Pacing, retry and status classification apply;
    /// a 2xx body that fails to decode is a permanent error.
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.retry
            .execute(|attempt| self.attempt_json(path, query, attempt))
            .await
    }

    /// GET a binary resource under the download deadline.
    pub async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes> {
        self.retry
            .execute(|attempt| self.attempt_bytes(path, query, attempt))
            .await
    }

    async fn attempt_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        attempt: u32,
    ) -> Result<Value> {
        let response = self.send(path, query, attempt, None).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::malformed_response(format!("{}: {}", self.label, e.without_url())))
    }

    async fn attempt_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
        attempt: u32,
    ) -> Result<Bytes> {
        let response = self
            .send(path, query, attempt, Some(self.download_timeout))
            .await?;
        response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("{} download timed out", self.label))
            } else {
                Error::network(format!("{}: body read failed", self.label))
            }
        })
    }

    /// One paced attempt: acquire a token, send, classify the outcome.
    async fn send(
        &self,
        path: &str,
        query: &[(&str, String)],
        attempt: u32,
        timeout_override: Option<Duration>,
    ) -> Result<reqwest::Response> {
        self.limiter.acquire().await;

        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.http.get(&url).query(query);
        if let Some(timeout) = timeout_override {
            request = request.timeout(timeout);
        }
        request = request.query(&[("api_key", self.api_key.expose_secret())]);

        let started = std::time::Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;
        let status = response.status();
        tracing::debug!(
            upstream = %self.label,
            path,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            attempt,
            "GET"
        );

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(self.classify_status(status, &body))
    }

    fn classify_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::timeout(format!("{} did not respond in time", self.label))
        } else if err.is_connect() {
            Error::network(format!("{}: connection failed", self.label))
        } else {
            // reqwest errors carry the full URL; strip it before display.
            Error::network(format!("{}: {}", self.label, err.without_url()))
        }
    }

    fn classify_status(&self, status: StatusCode, body: &str) -> Error {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Error::rate_limited(self.label.clone());
        }
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            status.canonical_reason().unwrap_or("upstream error").to_string()
        } else {
            truncate_body(trimmed)
        };
        Error::upstream(status.as_u16(), message)
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        let mut out: String = body.chars().take(MAX_ERROR_BODY).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_passes_through() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn test_truncate_body_caps_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.chars().count(), MAX_ERROR_BODY + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "§".repeat(300);
        let out = truncate_body(&long);
        assert_eq!(out.chars().count(), MAX_ERROR_BODY + 3);
    }
}
