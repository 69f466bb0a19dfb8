//! Tool infrastructure — schemas, registry, dispatch, envelope, surfaces.
//!
//! Schemas and the registry are plain data; the dispatcher is the only
//! place invocations run; the two surface modules declare every tool over
//! the typed upstream clients.

pub mod congress;
pub mod dispatch;
pub mod govinfo;
pub mod registry;
pub mod result;
pub mod schema;

pub use congress::register_congress_tools;
pub use dispatch::{ToolDispatcher, ToolInvocation};
pub use govinfo::register_govinfo_tools;
pub use registry::{handler, ToolDefinition, ToolHandler, ToolRegistry};
pub use result::{ContentBlock, ToolResult};
pub use schema::{FieldDef, FieldType, InputSchema};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{Error, Result};

/// Decode schema-validated arguments into a typed shape.
///
/// Runs after validation, so a failure here means the schema and the typed
/// shape drifted apart; it surfaces as an internal error.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::internal(format!("argument decode: {}", e)))
}
