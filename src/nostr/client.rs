// ABOUTME: Publisher trait and its implementations - NostrClient signs once and
// ABOUTME: fans out to every relay; MemoryPublisher signs and keeps events locally.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};
use url::Url;

use super::{Event, EventTemplate, Keys, RelayConnection, sign};
use crate::config::NostrConfig;
use crate::error::NostrError;

/// Outcome of publishing one event to a set of relays.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub event: Event,
    /// Relays that accepted the event.
    pub accepted: Vec<String>,
    /// Relays that rejected the event or failed, with the reason.
    pub rejected: Vec<(String, String)>,
}

impl PublishReport {
    pub fn relay_count(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// Something that can sign and publish Nostr events.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Hex public key of the author events are signed as.
    fn public_key_hex(&self) -> String;

    /// Sign `template` and publish it.
    async fn publish(&self, template: EventTemplate) -> Result<PublishReport, NostrError>;
}

/// Publishes signed events to a fixed set of relays.
#[derive(Debug)]
pub struct NostrClient {
    keys: Keys,
    relays: Vec<RelayConnection>,
    publish_timeout: Duration,
}

impl NostrClient {
    pub fn new(keys: Keys, relays: Vec<Url>, publish_timeout: Duration) -> Self {
        Self {
            keys,
            relays: relays.into_iter().map(RelayConnection::new).collect(),
            publish_timeout,
        }
    }

    /// Build a client from configuration, generating keys when asked to.
    pub fn from_config(config: &NostrConfig) -> Result<Self, NostrError> {
        let keys = Keys::from_setting(&config.private_key)?;
        Ok(Self::new(
            keys,
            config.relays.clone(),
            config.publish_timeout,
        ))
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn relay_urls(&self) -> Vec<&Url> {
        self.relays.iter().map(RelayConnection::url).collect()
    }

    /// Close every relay connection.
    pub async fn disconnect_all(&self) {
        join_all(self.relays.iter().map(|relay| relay.disconnect())).await;
    }
}

#[async_trait]
impl Publisher for NostrClient {
    fn public_key_hex(&self) -> String {
        self.keys.public_key_hex()
    }

    async fn publish(&self, template: EventTemplate) -> Result<PublishReport, NostrError> {
        if self.relays.is_empty() {
            return Err(NostrError::NoRelays);
        }

        let event = sign(&template, &self.keys)?;
        let outcomes = join_all(
            self.relays
                .iter()
                .map(|relay| relay.publish(&event, self.publish_timeout)),
        )
        .await;

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for (relay, outcome) in self.relays.iter().zip(outcomes) {
            let url = relay.url().to_string();
            match outcome {
                Ok(confirmation) if confirmation.accepted => accepted.push(url),
                Ok(confirmation) => {
                    warn!(relay = %url, reason = %confirmation.message, "relay rejected event");
                    rejected.push((url, confirmation.message));
                }
                Err(e) => {
                    warn!(relay = %url, error = %e, "publish to relay failed");
                    rejected.push((url, e.to_string()));
                }
            }
        }

        if accepted.is_empty() {
            let reasons = rejected
                .iter()
                .map(|(url, reason)| format!("{url}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(NostrError::NoRelayAccepted {
                event_id: event.id,
                reasons,
            });
        }

        info!(
            event_id = %event.id,
            kind = event.kind,
            accepted = accepted.len(),
            total = self.relays.len(),
            "event published"
        );
        Ok(PublishReport {
            event,
            accepted,
            rejected,
        })
    }
}

/// Label used for the single pseudo-relay of a [`MemoryPublisher`].
pub const MEMORY_RELAY: &str = "memory://local";

/// Signs events and keeps them in memory instead of sending them anywhere.
#[derive(Debug)]
pub struct MemoryPublisher {
    keys: Keys,
    published: Mutex<Vec<Event>>,
}

impl MemoryPublisher {
    pub fn new(keys: Keys) -> Self {
        Self {
            keys,
            published: Mutex::new(Vec::new()),
        }
    }

    /// Events published so far, oldest first.
    pub fn published(&self) -> Vec<Event> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    fn public_key_hex(&self) -> String {
        self.keys.public_key_hex()
    }

    async fn publish(&self, template: EventTemplate) -> Result<PublishReport, NostrError> {
        let event = sign(&template, &self.keys)?;
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        info!(event_id = %event.id, kind = event.kind, "event kept in memory");

        Ok(PublishReport {
            event,
            accepted: vec![MEMORY_RELAY.to_string()],
            rejected: Vec::new(),
        })
    }
}
