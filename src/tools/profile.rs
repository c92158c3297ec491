// ABOUTME: PublishProfileTool - publishes kind-0 profile metadata (name, about,
// ABOUTME: picture, NIP-05, website, lightning address) to the configured relays.

use std::sync::Arc;

use async_trait::async_trait;

use super::{PUBLISH_PROFILE, publish_result};
use crate::nostr::{EventTemplate, ProfileMetadata, Publisher};
use crate::tool::{Tool, ToolResult};

/// Tool for publishing the author's profile.
pub struct PublishProfileTool {
    publisher: Arc<dyn Publisher>,
}

impl PublishProfileTool {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Tool for PublishProfileTool {
    fn name(&self) -> &str {
        PUBLISH_PROFILE
    }

    fn description(&self) -> &str {
        "Publish Nostr profile metadata (name, about, picture, NIP-05 identifier, website, lightning address)."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Profile name" },
                "display_name": { "type": "string", "description": "Display name" },
                "about": { "type": "string", "description": "Short bio" },
                "picture": { "type": "string", "description": "Avatar image URL" },
                "banner": { "type": "string", "description": "Banner image URL" },
                "nip05": { "type": "string", "description": "NIP-05 identifier, e.g. name@example.com" },
                "website": { "type": "string", "description": "Website URL" },
                "lud16": { "type": "string", "description": "Lightning address" }
            }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let profile: ProfileMetadata = serde_json::from_value(params)?;
        if profile.is_empty() {
            anyhow::bail!("at least one profile field is required");
        }

        let template = EventTemplate::metadata(&profile)?;
        let report = self.publisher.publish(template).await?;

        Ok(publish_result("profile", &report).with_metadata("profile", &profile))
    }
}
