// ABOUTME: Defines all error types for the nostr-vibe library using thiserror.
// ABOUTME: Each subsystem has its own error enum, unified under VibeError.

/// Top-level error type for the nostr-vibe library.
#[derive(Debug, thiserror::Error)]
pub enum VibeError {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Nostr error: {0}")]
    Nostr(#[from] NostrError),
}

/// Errors from tool operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    /// True when the failure came from the registry lookup rather than a handler.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolError::NotFound(_))
    }
}

/// Errors from loading or bootstrapping configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Errors from the Nostr protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum NostrError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Not connected to relay {0}")]
    NotConnected(String),

    #[error("No relays configured")]
    NoRelays,

    #[error("No relay accepted event {event_id}: {reasons}")]
    NoRelayAccepted { event_id: String, reasons: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
