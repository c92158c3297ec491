// ABOUTME: Defines the ToolResult type - content, soft-error flag and
// ABOUTME: structured metadata (event ids, relay lists) from one invocation.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// The output content.
    pub content: String,

    /// Whether this result represents an error the handler chose to report softly.
    pub is_error: bool,

    /// Structured details about the execution.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            metadata: HashMap::new(),
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the result. Values that fail to serialize are dropped.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }

    /// Read a string metadata entry.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text("")
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            write!(f, "error: {}", self.content)
        } else {
            f.write_str(&self.content)
        }
    }
}
