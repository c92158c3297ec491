// ABOUTME: PublishRandomVibeTool - publishes a note picked at random from a
// ABOUTME: built-in (or caller-provided) list of vibes; takes no arguments.

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use super::{PUBLISH_RANDOM_VIBE, publish_result};
use crate::error::ToolError;
use crate::nostr::{EventTemplate, Publisher};
use crate::tool::{Tool, ToolResult};

pub const DEFAULT_VIBES: &[&str] = &[
    "Stay humble, stack sats. 🧡",
    "Tick tock, next block. ⏰",
    "Just checked the mempool. Vibes are immaculate.",
    "Don't trust, verify. Then verify again.",
    "Low time preference, high vibe preference. ✨",
    "Fix the money, fix the world. 🌍",
    "Another day, another block. The network keeps humming.",
    "Running a node is self-care. 🩺",
    "Be your own bank, but also drink some water. 💧",
    "Zap someone today. Small gestures, big vibes. ⚡",
];

/// Tool that publishes an internally chosen note.
pub struct PublishRandomVibeTool {
    publisher: Arc<dyn Publisher>,
    vibes: Vec<String>,
}

impl PublishRandomVibeTool {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            vibes: DEFAULT_VIBES.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Use a custom vibe list instead of [`DEFAULT_VIBES`].
    pub fn with_vibes(publisher: Arc<dyn Publisher>, vibes: Vec<String>) -> Result<Self, ToolError> {
        if vibes.is_empty() {
            return Err(ToolError::InvalidParams(
                "vibe list must not be empty".to_string(),
            ));
        }
        Ok(Self { publisher, vibes })
    }

    pub fn vibes(&self) -> &[String] {
        &self.vibes
    }

    fn pick(&self) -> Option<String> {
        let mut rng = rand::rng();
        self.vibes.choose(&mut rng).cloned()
    }
}

#[async_trait]
impl Tool for PublishRandomVibeTool {
    fn name(&self) -> &str {
        PUBLISH_RANDOM_VIBE
    }

    fn description(&self) -> &str {
        "Publish a randomly chosen vibe note to Nostr. Takes no arguments."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let vibe = self
            .pick()
            .ok_or_else(|| anyhow::anyhow!("no vibes to choose from"))?;

        let report = self
            .publisher
            .publish(EventTemplate::text_note(vibe.clone()))
            .await?;

        Ok(publish_result("vibe", &report).with_metadata("vibe", vibe))
    }
}
