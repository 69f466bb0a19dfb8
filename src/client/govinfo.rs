//! GovInfo.gov API client.
//!
//! Collection discovery, package metadata and binary package downloads.
//! Downloads carry a SHA-256 checksum so callers can verify and deduplicate
//! what they fetched.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::client::http::Transport;
use crate::client::params::{self, GovInfoPaging};
use crate::client::rate_limit::RateLimiter;
use crate::types::{Result, UpstreamConfig};

/// A downloaded package rendition plus its checksum.
#[derive(Debug, Clone)]
pub struct PackageDownload {
    pub package_id: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub sha256: String,
}

/// Typed access to the GovInfo.gov REST API.
#[derive(Debug, Clone)]
pub struct GovInfoClient {
    transport: Transport,
}

impl GovInfoClient {
    pub fn new(config: &UpstreamConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, limiter)?,
        })
    }

    /// Discover available collections (BILLS, PLAW, FR, ...).
    pub async fn collections(&self) -> Result<Value> {
        self.transport.get_json("collections", &[]).await
    }

    /// Packages added or changed in one collection since `from_date`.
    pub async fn collection_updates(
        &self,
        collection: &str,
        from_date: &str,
        paging: GovInfoPaging,
    ) -> Result<Value> {
        params::validate_collection_code(collection)?;
        params::validate_from_date(from_date)?;
        paging.validate()?;
        let path = format!("collections/{}/{}", collection, from_date);
        self.transport.get_json(&path, &paging_query(&paging)).await
    }

    /// Metadata summary for one package.
    pub async fn package_summary(&self, package_id: &str) -> Result<Value> {
        params::non_empty("packageId", package_id)?;
        let path = format!("packages/{}/summary", package_id);
        self.transport.get_json(&path, &[]).await
    }

    /// Granules contained in one package.
    pub async fn package_granules(&self, package_id: &str, paging: GovInfoPaging) -> Result<Value> {
        params::non_empty("packageId", package_id)?;
        paging.validate()?;
        let path = format!("packages/{}/granules", package_id);
        self.transport.get_json(&path, &paging_query(&paging)).await
    }

    /// Metadata summary for one granule within a package.
    pub async fn granule_summary(&self, package_id: &str, granule_id: &str) -> Result<Value> {
        params::non_empty("packageId", package_id)?;
        params::non_empty("granuleId", granule_id)?;
        let path = format!("packages/{}/granules/{}/summary", package_id, granule_id);
        self.transport.get_json(&path, &[]).await
    }

    /// Download one rendition of a package and checksum it.
    pub async fn download_package(
        &self,
        package_id: &str,
        content_type: &str,
    ) -> Result<PackageDownload> {
        params::non_empty("packageId", package_id)?;
        params::validate_content_type(content_type)?;
        let path = format!("packages/{}/{}", package_id, content_type);
        let bytes = self.transport.get_bytes(&path, &[]).await?;
        let sha256 = digest_hex(&bytes);
        Ok(PackageDownload {
            package_id: package_id.to_string(),
            content_type: content_type.to_string(),
            bytes,
            sha256,
        })
    }
}

/// The collections and granules endpoints page by opaque mark; `*` means
/// start from the beginning, so absent input still sends a mark.
fn paging_query(paging: &GovInfoPaging) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(page_size) = paging.page_size {
        pairs.push(("pageSize", page_size.to_string()));
    }
    let mark = paging.offset_mark.clone().unwrap_or_else(|| "*".to_string());
    pairs.push(("offsetMark", mark));
    pairs
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
