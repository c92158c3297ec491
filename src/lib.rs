// ABOUTME: Root module for nostr-vibe - Nostr publishing tools behind an async
// ABOUTME: tool registry, plus the scheduler and smoke-run driver built on them.

pub mod config;
pub mod driver;
pub mod error;
pub mod nostr;
pub mod prelude;
pub mod schedule;
pub mod tool;
pub mod tools;

pub use error::VibeError;
