//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Upstream failures are classified into
//! transient and permanent so the retry layer can decide without string
//! matching.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the OpenDiscourse access layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied arguments failed structural validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No tool registered under the requested name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool name was registered twice.
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),

    /// Request exceeded its deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Connection-level failure (refused, reset, DNS).
    #[error("network error: {0}")]
    Network(String),

    /// Upstream returned HTTP 429.
    #[error("rate limited by {upstream}")]
    RateLimited {
        /// Which upstream throttled us.
        upstream: String,
    },

    /// Upstream returned a non-success status other than 429.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// Upstream replied 2xx but the body did not decode as expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading failures (missing or unparsable environment).
    #[error("config error: {0}")]
    Config(String),

    /// Internal errors (panics, broken invariants).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for each variant.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::UnknownTool(_) => "UNKNOWN_TOOL",
            Error::DuplicateTool(_) => "DUPLICATE_TOOL",
            Error::Timeout(_) => "TIMEOUT",
            Error::Network(_) => "NETWORK",
            Error::RateLimited { .. } => "RATE_LIMITED",
            Error::Upstream { .. } => "UPSTREAM_ERROR",
            Error::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Config(_) => "CONFIG",
            Error::Internal(_) => "INTERNAL",
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Timeouts, connection failures, 429s and 5xx responses are transient.
    /// Validation failures, 4xx responses and decode errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Network(_) | Error::RateLimited { .. } => true,
            Error::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn duplicate_tool(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn rate_limited(upstream: impl Into<String>) -> Self {
        Self::RateLimited {
            upstream: upstream.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
