// ABOUTME: Implements the Registry - a thread-safe name-to-handler map that
// ABOUTME: executes tools and separates lookup failures from handler failures.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{Tool, ToolDefinition, ToolResult};
use crate::error::ToolError;

/// A thread-safe registry of tools.
#[derive(Default)]
pub struct Registry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name is replaced.
    pub async fn register<T: Tool + 'static>(&self, tool: T) {
        self.register_arc(Arc::new(tool)).await;
    }

    /// Register a tool from an Arc.
    pub async fn register_arc(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().await;
        debug!(tool = tool.name(), "registering tool");
        tools.insert(tool.name().to_string(), tool);
    }

    /// Unregister a tool by name.
    pub async fn unregister(&self, name: &str) {
        let mut tools = self.tools.write().await;
        tools.remove(name);
    }

    /// Get a tool by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// List all tool names, sorted alphabetically.
    pub async fn list(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<_> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all registered tools.
    pub async fn all(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.values().cloned().collect()
    }

    /// Get the number of registered tools.
    pub async fn count(&self) -> usize {
        let tools = self.tools.read().await;
        tools.len()
    }

    /// Describe every registered tool, sorted by name.
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut defs: Vec<_> = tools.values().map(|t| ToolDefinition::of(t.as_ref())).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a named tool with an argument bag.
    ///
    /// Returns [`ToolError::NotFound`] when no tool is registered under `name`
    /// and [`ToolError::Execution`] when the handler itself fails. The lock is
    /// released before the handler runs, so long publishes never block
    /// registration.
    pub async fn execute(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(name)
            .await
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(tool = name, "executing tool");
        tool.execute(params)
            .await
            .map_err(|source| ToolError::Execution {
                tool: name.to_string(),
                source,
            })
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            tools: Arc::clone(&self.tools),
        }
    }
}
