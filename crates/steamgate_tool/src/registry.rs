//! Tool registry.
//!
//! Populated once at startup, then shared read-only. Iteration order is
//! registration order.

use crate::schema::ToolSchema;
use crate::trait_::{Contract, Tool, ToolContract};
use indexmap::IndexMap;
use std::sync::Arc;

/// Error from registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Tool already registered
    #[error("tool already registered: {name}")]
    AlreadyRegistered {
        /// The duplicate tool name
        name: String,
    },
}

/// Registry for tools
#[derive(Default)]
pub struct ToolRegistry {
    /// Registered tools by name
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed contract
    ///
    /// # Errors
    ///
    /// Returns error if a tool with the same name is already registered
    pub fn register<C: ToolContract>(&mut self, contract: C) -> Result<(), RegistryError> {
        self.register_tool(Arc::new(Contract::new(contract)))
    }

    /// Register an already-erased tool
    ///
    /// # Errors
    ///
    /// Returns error if a tool with the same name is already registered
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Metadata of every tool, in registration order
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|tool| tool.schema().clone()).collect()
    }

    /// Get count of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
