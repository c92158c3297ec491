// ABOUTME: NIP-01 events - templates, canonical serialization, id hashing,
// ABOUTME: signing, verification, and the kind-0 profile metadata payload.

use std::time::{SystemTime, UNIX_EPOCH};

use secp256k1::{Message, Secp256k1, XOnlyPublicKey, schnorr};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Keys;
use crate::error::NostrError;

pub const KIND_METADATA: u16 = 0;
pub const KIND_TEXT_NOTE: u16 = 1;

/// A signed Nostr event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Lowercase hex sha256 of the canonical serialization.
    pub id: String,
    /// Lowercase hex x-only public key of the author.
    pub pubkey: String,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    /// Lowercase hex Schnorr signature over `id`.
    pub sig: String,
}

/// An event before it has an author or signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTemplate {
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
}

impl EventTemplate {
    /// A template stamped with the current time.
    pub fn new(kind: u16, content: impl Into<String>) -> Self {
        Self {
            created_at: unix_now(),
            kind,
            tags: Vec::new(),
            content: content.into(),
        }
    }

    /// A kind-1 short text note.
    pub fn text_note(content: impl Into<String>) -> Self {
        Self::new(KIND_TEXT_NOTE, content)
    }

    /// A kind-0 metadata event carrying the profile as JSON content.
    pub fn metadata(profile: &ProfileMetadata) -> Result<Self, NostrError> {
        Ok(Self::new(KIND_METADATA, serde_json::to_string(profile)?))
    }

    pub fn with_tags(mut self, tags: Vec<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Profile fields published as kind-0 content. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip05: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Lightning address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lud16: Option<String>,
}

impl ProfileMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Canonical serialization used for the event id:
/// `[0, pubkey, created_at, kind, tags, content]`.
pub fn serialize_for_id(pubkey: &str, template: &EventTemplate) -> Result<String, NostrError> {
    if pubkey.len() != 64 || !pubkey.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NostrError::InvalidEvent(format!(
            "pubkey must be 64 hex characters: {pubkey}"
        )));
    }
    if pubkey != pubkey.to_lowercase() {
        return Err(NostrError::InvalidEvent("pubkey must be lowercase".into()));
    }

    Ok(serde_json::to_string(&(
        0,
        pubkey,
        template.created_at,
        template.kind,
        &template.tags,
        &template.content,
    ))?)
}

/// sha256 of the canonical serialization.
pub fn event_id(pubkey: &str, template: &EventTemplate) -> Result<[u8; 32], NostrError> {
    let serialized = serialize_for_id(pubkey, template)?;
    Ok(Sha256::digest(serialized.as_bytes()).into())
}

/// Sign a template, producing a complete event authored by `keys`.
pub fn sign(template: &EventTemplate, keys: &Keys) -> Result<Event, NostrError> {
    let pubkey = keys.public_key_hex();
    let id = event_id(&pubkey, template)?;
    let sig = keys.sign_digest(id);

    Ok(Event {
        id: hex::encode(id),
        pubkey,
        created_at: template.created_at,
        kind: template.kind,
        tags: template.tags.clone(),
        content: template.content.clone(),
        sig: hex::encode(sig.serialize()),
    })
}

impl Event {
    /// The template this event was signed from.
    pub fn template(&self) -> EventTemplate {
        EventTemplate {
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: self.content.clone(),
        }
    }

    /// Check that `id` matches the content and `sig` is valid for `pubkey`.
    ///
    /// Returns `Ok(false)` for a well-formed event that does not verify and
    /// `Err` when a field cannot even be decoded.
    pub fn verify(&self) -> Result<bool, NostrError> {
        let computed = event_id(&self.pubkey, &self.template())?;
        if hex::encode(computed) != self.id {
            return Ok(false);
        }

        let sig_bytes = hex::decode(&self.sig)
            .map_err(|e| NostrError::InvalidEvent(format!("signature is not hex: {e}")))?;
        let sig = schnorr::Signature::from_slice(&sig_bytes)
            .map_err(|e| NostrError::InvalidEvent(format!("invalid signature: {e}")))?;

        let pubkey_bytes = hex::decode(&self.pubkey)
            .map_err(|e| NostrError::InvalidEvent(format!("pubkey is not hex: {e}")))?;
        let pubkey = XOnlyPublicKey::from_slice(&pubkey_bytes)
            .map_err(|e| NostrError::InvalidEvent(format!("invalid pubkey: {e}")))?;

        let secp = Secp256k1::verification_only();
        Ok(secp
            .verify_schnorr(&sig, &Message::from_digest(computed), &pubkey)
            .is_ok())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
