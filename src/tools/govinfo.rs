//! GovInfo.gov tool surface.
//!
//! Collection discovery, package metadata and downloads. The download tool
//! never puts raw bytes in an envelope; it reports size and SHA-256 so
//! callers can verify what landed.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::params::GovInfoPaging;
use crate::client::GovInfoClient;
use crate::tools::parse_args;
use crate::tools::registry::{handler, ToolDefinition, ToolRegistry};
use crate::tools::schema::{FieldType, InputSchema};
use crate::types::Result;

/// Register all GovInfo.gov tools on `registry`.
pub fn register_govinfo_tools(
    registry: &mut ToolRegistry,
    client: Arc<GovInfoClient>,
) -> Result<()> {
    register_collections(registry, Arc::clone(&client))?;
    register_packages(registry, Arc::clone(&client))?;
    register_download(registry, client)?;
    Ok(())
}

// =============================================================================
// Shared schema fragments and argument shapes
// =============================================================================

fn with_mark_paging(schema: InputSchema) -> InputSchema {
    schema
        .optional(
            "pageSize",
            FieldType::integer_in(1, 100),
            "Results per page (default 20, maximum 100)",
        )
        .optional(
            "offsetMark",
            FieldType::String,
            "Opaque pagination mark from a previous page (default *)",
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkPageArgs {
    page_size: Option<u32>,
    offset_mark: Option<String>,
}

impl MarkPageArgs {
    fn into_paging(self) -> GovInfoPaging {
        GovInfoPaging {
            page_size: self.page_size,
            offset_mark: self.offset_mark,
        }
    }
}

fn package_id_field(schema: InputSchema) -> InputSchema {
    schema.required(
        "packageId",
        FieldType::String,
        "Package identifier, e.g. BILLS-118hr1ih",
    )
}

// =============================================================================
// Collection tools
// =============================================================================

fn register_collections(registry: &mut ToolRegistry, client: Arc<GovInfoClient>) -> Result<()> {
    let list_client = Arc::clone(&client);
    registry.register(
        ToolDefinition::new(
            "govinfo_list_collections",
            "List the collections available on GovInfo (BILLS, PLAW, FR, ...).",
            InputSchema::new(),
        ),
        handler(move |_args| {
            let client = Arc::clone(&list_client);
            async move { client.collections().await }
        }),
    )?;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct UpdatesArgs {
        collection: String,
        from_date: String,
        #[serde(flatten)]
        page: MarkPageArgs,
    }

    registry.register(
        ToolDefinition::new(
            "govinfo_get_collection_updates",
            "List packages added or changed in one collection since a timestamp.",
            with_mark_paging(
                InputSchema::new()
                    .required(
                        "collection",
                        FieldType::String,
                        "Collection code, e.g. BILLS",
                    )
                    .required(
                        "fromDate",
                        FieldType::String,
                        "RFC 3339 timestamp, e.g. 2024-01-01T00:00:00Z",
                    ),
            ),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: UpdatesArgs = parse_args(args)?;
                client
                    .collection_updates(&args.collection, &args.from_date, args.page.into_paging())
                    .await
            }
        }),
    )
}

// =============================================================================
// Package and granule tools
// =============================================================================

fn register_packages(registry: &mut ToolRegistry, client: Arc<GovInfoClient>) -> Result<()> {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PackageArgs {
        package_id: String,
    }

    let summary_client = Arc::clone(&client);
    registry.register(
        ToolDefinition::new(
            "govinfo_get_package_summary",
            "Fetch the metadata summary for one package.",
            package_id_field(InputSchema::new()),
        ),
        handler(move |args| {
            let client = Arc::clone(&summary_client);
            async move {
                let args: PackageArgs = parse_args(args)?;
                client.package_summary(&args.package_id).await
            }
        }),
    )?;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GranulesArgs {
        package_id: String,
        #[serde(flatten)]
        page: MarkPageArgs,
    }

    let granules_client = Arc::clone(&client);
    registry.register(
        ToolDefinition::new(
            "govinfo_list_package_granules",
            "List the granules contained in one package.",
            with_mark_paging(package_id_field(InputSchema::new())),
        ),
        handler(move |args| {
            let client = Arc::clone(&granules_client);
            async move {
                let args: GranulesArgs = parse_args(args)?;
                client
                    .package_granules(&args.package_id, args.page.into_paging())
                    .await
            }
        }),
    )?;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GranuleSummaryArgs {
        package_id: String,
        granule_id: String,
    }

    registry.register(
        ToolDefinition::new(
            "govinfo_get_granule_summary",
            "Fetch the metadata summary for one granule within a package.",
            package_id_field(InputSchema::new()).required(
                "granuleId",
                FieldType::String,
                "Granule identifier within the package",
            ),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: GranuleSummaryArgs = parse_args(args)?;
                client
                    .granule_summary(&args.package_id, &args.granule_id)
                    .await
            }
        }),
    )
}

// =============================================================================
// Download tool
// =============================================================================

fn register_download(registry: &mut ToolRegistry, client: Arc<GovInfoClient>) -> Result<()> {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct DownloadArgs {
        package_id: String,
        content_type: String,
    }

    registry.register(
        ToolDefinition::new(
            "govinfo_download_package",
            "Download one rendition of a package and report its size and SHA-256 checksum.",
            package_id_field(InputSchema::new()).required(
                "contentType",
                FieldType::one_of(&["pdf", "xml", "htm", "zip", "mods", "premis"]),
                "Rendition to download",
            ),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: DownloadArgs = parse_args(args)?;
                let download = client
                    .download_package(&args.package_id, &args.content_type)
                    .await?;
                Ok(json!({
                    "packageId": download.package_id,
                    "contentType": download.content_type,
                    "sizeBytes": download.bytes.len(),
                    "sha256": download.sha256,
                }))
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RateLimiter;
    use crate::types::{RateLimitConfig, UpstreamConfig};

    fn test_registry() -> ToolRegistry {
        let config = UpstreamConfig::for_tests("govinfo.gov", "http://127.0.0.1:1", "test-key");
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
        let client = Arc::new(GovInfoClient::new(&config, limiter).unwrap());
        let mut registry = ToolRegistry::new();
        register_govinfo_tools(&mut registry, client).unwrap();
        registry
    }

    #[test]
    fn test_all_govinfo_tools_registered() {
        let registry = test_registry();
        let names: Vec<&str> = registry.definitions().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "govinfo_list_collections",
                "govinfo_get_collection_updates",
                "govinfo_get_package_summary",
                "govinfo_list_package_granules",
                "govinfo_get_granule_summary",
                "govinfo_download_package",
            ]
        );
    }

    #[test]
    fn test_collection_updates_schema_bounds() {
        let registry = test_registry();
        let (def, _) = registry.resolve("govinfo_get_collection_updates").unwrap();
        let schema = def.input_schema.to_json_schema();
        assert_eq!(schema["properties"]["pageSize"]["maximum"], 100);
        assert_eq!(
            schema["required"],
            serde_json::json!(["collection", "fromDate"])
        );
    }

    #[test]
    fn test_download_schema_restricts_renditions() {
        let registry = test_registry();
        let (def, _) = registry.resolve("govinfo_download_package").unwrap();
        let schema = def.input_schema.to_json_schema();
        assert_eq!(
            schema["properties"]["contentType"]["enum"],
            serde_json::json!(["pdf", "xml", "htm", "zip", "mods", "premis"])
        );
    }

    #[test]
    fn test_list_collections_takes_no_arguments() {
        let registry = test_registry();
        let (def, _) = registry.resolve("govinfo_list_collections").unwrap();
        assert!(def.input_schema.validate(&serde_json::json!({})).is_empty());
        assert!(!def
            .input_schema
            .validate(&serde_json::json!({"bogus": 1}))
            .is_empty());
    }
}
