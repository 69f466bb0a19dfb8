//! Upstream API access layer.
//!
//! Pacing, retry and transport live here, under typed per-resource clients
//! for Congress.gov and GovInfo.gov. Parameter bounds are enforced locally
//! so a bad call never reaches the network.

pub mod congress;
pub mod govinfo;
pub mod http;
pub mod params;
pub mod rate_limit;
pub mod retry;

pub use congress::CongressClient;
pub use govinfo::{GovInfoClient, PackageDownload};
pub use http::Transport;
pub use params::{Chamber, GovInfoPaging, Pagination};
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
