//! Stdio JSON-RPC transport layer.
//!
//! Speaks newline-delimited JSON-RPC 2.0 so tool clients can drive the
//! registry over a pipe. One request per line, one response per line,
//! notifications consumed silently.

pub mod rpc;
pub mod stdio;

pub use stdio::StdioServer;
