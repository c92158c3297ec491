// ABOUTME: PublishNoteTool - publishes a caller-supplied kind-1 text note.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{PUBLISH_NOTE, publish_result};
use crate::nostr::{EventTemplate, Publisher};
use crate::tool::{Tool, ToolResult};

/// Tool for publishing a free-text note.
pub struct PublishNoteTool {
    publisher: Arc<dyn Publisher>,
}

impl PublishNoteTool {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Tool for PublishNoteTool {
    fn name(&self) -> &str {
        PUBLISH_NOTE
    }

    fn description(&self) -> &str {
        "Publish a text note to Nostr."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The note text"
                },
                "tags": {
                    "type": "array",
                    "description": "Optional NIP-01 tags, each an array of strings",
                    "items": { "type": "array", "items": { "type": "string" } }
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            content: String,
            #[serde(default)]
            tags: Vec<Vec<String>>,
        }
        let params: Params = serde_json::from_value(params)?;

        if params.content.trim().is_empty() {
            anyhow::bail!("note content must not be empty");
        }

        let template = EventTemplate::text_note(params.content).with_tags(params.tags);
        let report = self.publisher.publish(template).await?;

        Ok(publish_result("note", &report))
    }
}
