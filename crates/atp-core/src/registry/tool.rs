//! Tool registry for locally hosted tools.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use atp_protocols::error::ToolError;
use atp_protocols::tool::{ToolDefinition, ToolSchema};

#[derive(Default)]
struct Catalog {
    order: Vec<String>,
    tools: HashMap<String, Arc<ToolDefinition>>,
}

/// Registry for managing tools.
///
/// Listing follows first-registration order. Re-registering a name swaps the
/// definition in place under the write lock, so readers see either the old
/// or the new definition and never a mix.
#[derive(Default)]
pub struct ToolRegistry {
    inner: RwLock<Catalog>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&self, definition: ToolDefinition) -> Result<(), ToolError> {
        definition.validate()?;

        let name = definition.name().to_string();
        let mut catalog = self.inner.write();
        if catalog
            .tools
            .insert(name.clone(), Arc::new(definition))
            .is_some()
        {
            info!("Replaced tool: {}", name);
        } else {
            debug!("Registered tool: {}", name);
            catalog.order.push(name);
        }
        Ok(())
    }

    /// Remove a tool.
    pub fn unregister(&self, name: &str) -> Option<Arc<ToolDefinition>> {
        let mut catalog = self.inner.write();
        let removed = catalog.tools.remove(name)?;
        catalog.order.retain(|n| n != name);
        Some(removed)
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Result<Arc<ToolDefinition>, ToolError> {
        self.get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<ToolDefinition>> {
        self.inner.read().tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().tools.contains_key(name)
    }

    /// All tools in registration order.
    pub fn list(&self) -> Vec<Arc<ToolDefinition>> {
        let catalog = self.inner.read();
        catalog
            .order
            .iter()
            .filter_map(|name| catalog.tools.get(name).cloned())
            .collect()
    }

    /// Public schemas in registration order.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.list().iter().map(|t| t.schema.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
