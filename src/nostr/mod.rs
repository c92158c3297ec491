// ABOUTME: Nostr module - keys, NIP-01 events, relay wire messages, relay
// ABOUTME: connections and the Publisher abstraction the tools sit on.

mod client;
mod event;
mod keys;
mod message;
mod relay;

pub use client::*;
pub use event::*;
pub use keys::*;
pub use message::*;
pub use relay::*;
