//! OpenDiscourse MCP server - main entry point.
//!
//! Speaks newline-delimited JSON-RPC on stdio and serves two tool families:
//! - Congress.gov: bills, members, committees, nominations, roll-call votes
//! - GovInfo.gov: collections, packages, granules, bulk downloads
//!
//! Both required API keys must be present in the environment; the process
//! exits non-zero before serving anything if either is missing.

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use opendiscourse_core::client::{CongressClient, GovInfoClient, RateLimiter};
use opendiscourse_core::server::StdioServer;
use opendiscourse_core::tools::{
    register_congress_tools, register_govinfo_tools, ToolDispatcher, ToolRegistry,
};
use opendiscourse_core::Config;

/// Which upstream tool families to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum UpstreamSelect {
    Congress,
    Govinfo,
    All,
}

#[derive(Debug, Parser)]
#[command(
    name = "opendiscourse-mcp",
    version,
    about = "Rate-limited tool server for Congress.gov and GovInfo.gov"
)]
struct Cli {
    /// Serve only one upstream's tools, or both.
    #[arg(long, value_enum, default_value = "all")]
    upstream: UpstreamSelect,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize observability (stderr only; stdout is the protocol stream)
    opendiscourse_core::observability::init_tracing();

    // Load configuration; missing credentials abort here
    let config = Config::from_env()?;

    tracing::info!("🚀 OpenDiscourse MCP server starting on stdio");

    // Each upstream gets its own rate limiter and HTTP client
    let mut registry = ToolRegistry::new();

    if matches!(cli.upstream, UpstreamSelect::Congress | UpstreamSelect::All) {
        let limiter = Arc::new(RateLimiter::new(config.congress.rate_limit.clone()));
        let client = Arc::new(CongressClient::new(&config.congress, limiter)?);
        register_congress_tools(&mut registry, client)?;
        tracing::info!("  ✓ congress.gov tools: {}", config.congress.base_url);
    }

    if matches!(cli.upstream, UpstreamSelect::Govinfo | UpstreamSelect::All) {
        let limiter = Arc::new(RateLimiter::new(config.govinfo.rate_limit.clone()));
        let client = Arc::new(GovInfoClient::new(&config.govinfo, limiter)?);
        register_govinfo_tools(&mut registry, client)?;
        tracing::info!("  ✓ govinfo.gov tools: {}", config.govinfo.base_url);
    }

    let dispatcher = Arc::new(ToolDispatcher::new(registry));
    tracing::info!("  ✓ {} tools registered", dispatcher.list_tools().len());

    let server = StdioServer::new(dispatcher);

    // Ctrl-C stops the serve loop after the in-flight line
    let cancel = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, shutting down");
            cancel.cancel();
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server.serve(stdin, stdout).await?;

    Ok(())
}
