//! Core types for the OpenDiscourse access layer.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Upstream, rate-limit and retry configuration

mod config;
mod errors;

pub use config::{
    Config, RateLimitConfig, RetryConfig, UpstreamConfig, DEFAULT_CONGRESS_BASE_URL,
    DEFAULT_GOVINFO_BASE_URL,
};
pub use errors::{Error, Result};
