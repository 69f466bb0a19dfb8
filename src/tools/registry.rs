//! Tool registry — name to definition and handler.
//!
//! Definitions are immutable once registered and listed in registration
//! order, so the order tools appear in a listing is the order the surfaces
//! registered them. Resolution is a map lookup.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::tools::schema::InputSchema;
use crate::types::{Error, Result};

/// Boxed async tool handler: JSON arguments in, JSON value out.
pub type ToolHandler = Box<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Box an async closure as a [`ToolHandler`].
pub fn handler<F, Fut>(f: F) -> ToolHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Box::new(move |args| Box::pin(f(args)))
}

/// Immutable metadata for one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, input_schema: InputSchema) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// In-memory registry of tool definitions and their handlers.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<(ToolDefinition, ToolHandler)>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.entries.len())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are unique for the life of the registry.
    pub fn register(&mut self, definition: ToolDefinition, handler: ToolHandler) -> Result<()> {
        if definition.name.is_empty() {
            return Err(Error::invalid_argument("tool name cannot be empty"));
        }
        if self.index.contains_key(&definition.name) {
            return Err(Error::duplicate_tool(definition.name));
        }
        self.index
            .insert(definition.name.clone(), self.entries.len());
        self.entries.push((definition, handler));
        Ok(())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.entries.iter().map(|(def, _)| def)
    }

    /// Look up one tool by name.
    pub fn resolve(&self, name: &str) -> Result<(&ToolDefinition, &ToolHandler)> {
        self.index
            .get(name)
            .map(|&i| {
                let (def, handler) = &self.entries[i];
                (def, handler)
            })
            .ok_or_else(|| Error::unknown_tool(name))
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::FieldType;
    use serde_json::json;

    fn echo_definition(name: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            "Echo the arguments back",
            InputSchema::new().optional("value", FieldType::String, "Anything"),
        )
    }

    fn echo_handler() -> ToolHandler {
        handler(|args| async move { Ok(args) })
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_definition("echo"), echo_handler())
            .unwrap();

        assert!(registry.has_tool("echo"));
        assert!(!registry.has_tool("missing"));
        assert_eq!(registry.len(), 1);

        let (def, _) = registry.resolve("echo").unwrap();
        assert_eq!(def.description, "Echo the arguments back");
    }

    #[test]
    fn test_resolve_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.resolve("nope").err().unwrap();
        assert!(matches!(err, Error::UnknownTool(_)));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_definition("echo"), echo_handler())
            .unwrap();
        let err = registry
            .register(echo_definition("echo"), echo_handler())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTool(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register(echo_definition(""), echo_handler())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zebra", "alpha", "middle"] {
            registry
                .register(echo_definition(name), echo_handler())
                .unwrap();
        }
        let names: Vec<&str> = registry.definitions().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }

    #[tokio::test]
    async fn test_resolved_handler_is_callable() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_definition("echo"), echo_handler())
            .unwrap();

        let (_, handler) = registry.resolve("echo").unwrap();
        let out = handler(json!({"value": "hi"})).await.unwrap();
        assert_eq!(out, json!({"value": "hi"}));
    }
}
