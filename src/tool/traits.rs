// ABOUTME: Defines the Tool trait - a named, invocable unit of functionality
// ABOUTME: - and ToolDefinition, the descriptor a registry hands out.

use async_trait::async_trait;
use serde::Serialize;

use super::ToolResult;

/// A named handler that can be executed through a registry.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given argument bag.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error>;
}

/// Name, description and schema of a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Build a definition from any tool.
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.schema(),
        }
    }
}
