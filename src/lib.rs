//! # OpenDiscourse Core - Legislative Data Access Layer
//!
//! Rust implementation of the OpenDiscourse tool server providing:
//! - Rate-limited, retrying HTTP clients for Congress.gov and GovInfo.gov
//! - Declarative tool registry with structural argument validation
//! - Dispatcher that wraps every outcome in a text-content result envelope
//! - Stdio JSON-RPC transport for tool clients
//!
//! ## Architecture
//!
//! Every tool call flows through the same pipeline, and nothing reaches an
//! upstream API without passing the rate limiter:
//! ```text
//!   JSON-RPC line → StdioServer → ToolDispatcher → handler
//!                                                    │
//!                              CongressClient / GovInfoClient
//!                                                    │
//!                                Transport (retry ∘ rate limit ∘ HTTP)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod client;
pub mod server;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
