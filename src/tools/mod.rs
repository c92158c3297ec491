// ABOUTME: Nostr tools - publish profile metadata, text notes and random
// ABOUTME: vibes through a shared Publisher, plus their registration helper.

mod note;
mod profile;
mod vibe;

use std::sync::Arc;

pub use note::PublishNoteTool;
pub use profile::PublishProfileTool;
pub use vibe::{DEFAULT_VIBES, PublishRandomVibeTool};

use crate::nostr::{PublishReport, Publisher};
use crate::tool::{Registry, ToolResult};

pub const PUBLISH_PROFILE: &str = "publish_nostr_profile";
pub const PUBLISH_NOTE: &str = "publish_nostr_note";
pub const PUBLISH_RANDOM_VIBE: &str = "publish_random_vibe";

/// Register the three Nostr tools, all publishing through `publisher`.
pub async fn register_nostr_tools(registry: &Registry, publisher: Arc<dyn Publisher>) {
    registry
        .register(PublishProfileTool::new(publisher.clone()))
        .await;
    registry.register(PublishNoteTool::new(publisher.clone())).await;
    registry.register(PublishRandomVibeTool::new(publisher)).await;
}

/// Turn a publish report into the result every Nostr tool returns.
fn publish_result(what: &str, report: &PublishReport) -> ToolResult {
    let rejected: Vec<_> = report
        .rejected
        .iter()
        .map(|(relay, reason)| serde_json::json!({ "relay": relay, "reason": reason }))
        .collect();

    ToolResult::text(format!(
        "Published {} {} to {}/{} relays",
        what,
        report.event.id,
        report.accepted.len(),
        report.relay_count()
    ))
    .with_metadata("event_id", &report.event.id)
    .with_metadata("pubkey", &report.event.pubkey)
    .with_metadata("kind", report.event.kind)
    .with_metadata("accepted_relays", &report.accepted)
    .with_metadata("rejected_relays", rejected)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::{Keys, MemoryPublisher};

    #[tokio::test]
    async fn test_register_nostr_tools() {
        let registry = Registry::new();
        let publisher = Arc::new(MemoryPublisher::new(Keys::generate()));
        register_nostr_tools(&registry, publisher).await;

        assert_eq!(
            registry.list().await,
            vec![PUBLISH_NOTE, PUBLISH_PROFILE, PUBLISH_RANDOM_VIBE]
        );
    }

    #[tokio::test]
    async fn test_registering_twice_keeps_three_tools() {
        let registry = Registry::new();
        let publisher = Arc::new(MemoryPublisher::new(Keys::generate()));
        register_nostr_tools(&registry, publisher.clone()).await;
        register_nostr_tools(&registry, publisher).await;

        assert_eq!(registry.count().await, 3);
    }

    #[tokio::test]
    async fn test_unknown_nostr_tool() {
        let registry = Registry::new();
        register_nostr_tools(&registry, Arc::new(MemoryPublisher::new(Keys::generate()))).await;

        let err = registry
            .execute("publish_nostr_poll", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
