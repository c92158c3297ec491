// ABOUTME: Configuration - creates the env file on first run and parses it
// ABOUTME: into an explicit NostrConfig without touching process environment.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use tracing::info;
use url::Url;

use crate::error::ConfigError;

pub const KEY_PRIVATE_KEY: &str = "NOSTR_PRIVATE_KEY";
pub const KEY_RELAYS: &str = "RELAYS";
pub const KEY_POST_INTERVAL: &str = "POST_INTERVAL";
pub const KEY_PUBLISH_TIMEOUT: &str = "PUBLISH_TIMEOUT";

/// Value of `NOSTR_PRIVATE_KEY` that asks for a freshly generated key.
pub const PLACEHOLDER_PRIVATE_KEY: &str = "your_private_key_here";

pub const DEFAULT_RELAYS: [&str; 3] = [
    "wss://relay.damus.io",
    "wss://relay.snort.social",
    "wss://nos.lol",
];
pub const DEFAULT_POST_INTERVAL: Duration = Duration::from_millis(3_600_000);
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Template written when no env file exists yet.
pub const ENV_TEMPLATE: &str = "# Nostr Configuration
# Your Nostr private key (hex format without 0x prefix)
# If left as 'your_private_key_here', a random key will be generated
NOSTR_PRIVATE_KEY=your_private_key_here

# Comma-separated list of relay URLs to publish to
RELAYS=wss://relay.damus.io,wss://relay.snort.social,wss://nos.lol

# The interval for posting random vibes (if used in a scheduled job)
POST_INTERVAL=3600000";

/// Write [`ENV_TEMPLATE`] to `path` unless a file is already there.
///
/// Returns `true` when the file was created. Existing files are never touched.
pub fn bootstrap_env_file(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // create_new makes the existence check and the creation one step.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    file.write_all(ENV_TEMPLATE.as_bytes())?;
    info!(path = %path.display(), "created env file");
    Ok(true)
}

/// Where the signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySetting {
    /// Generate a random key at startup.
    Generate,
    /// A hex-encoded 32-byte secret key.
    Hex(String),
}

impl std::fmt::Debug for KeySetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySetting::Generate => write!(f, "Generate"),
            KeySetting::Hex(_) => write!(f, "Hex(<redacted>)"),
        }
    }
}

/// Everything the Nostr tools need, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct NostrConfig {
    pub private_key: KeySetting,
    pub relays: Vec<Url>,
    pub post_interval: Duration,
    pub publish_timeout: Duration,
}

impl Default for NostrConfig {
    fn default() -> Self {
        Self {
            private_key: KeySetting::Generate,
            relays: default_relays(),
            post_interval: DEFAULT_POST_INTERVAL,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }
}

impl NostrConfig {
    /// Read key/value pairs from an env file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut pairs = Vec::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            pairs.push(item?);
        }
        Self::from_pairs(pairs)
    }

    /// Build a config from key/value pairs. Unknown keys are ignored;
    /// missing keys take their defaults.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                KEY_PRIVATE_KEY => config.private_key = parse_key_setting(value),
                KEY_RELAYS => config.relays = parse_relays(value)?,
                KEY_POST_INTERVAL => {
                    config.post_interval = parse_millis(KEY_POST_INTERVAL, value)?
                }
                KEY_PUBLISH_TIMEOUT => {
                    config.publish_timeout = parse_millis(KEY_PUBLISH_TIMEOUT, value)?
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn default_relays() -> Vec<Url> {
    DEFAULT_RELAYS
        .iter()
        .filter_map(|r| Url::parse(r).ok())
        .collect()
}

fn parse_key_setting(value: &str) -> KeySetting {
    if value.is_empty() || value == PLACEHOLDER_PRIVATE_KEY {
        KeySetting::Generate
    } else {
        KeySetting::Hex(value.to_string())
    }
}

/// Parse a comma-separated relay list, skipping blank entries.
pub fn parse_relays(value: &str) -> Result<Vec<Url>, ConfigError> {
    let mut relays = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let url = Url::parse(entry).map_err(|e| invalid(KEY_RELAYS, format!("{entry}: {e}")))?;
        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(invalid(
                KEY_RELAYS,
                format!("{entry}: relay URLs must use ws:// or wss://"),
            ));
        }
        relays.push(url);
    }
    Ok(relays)
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = value
        .parse()
        .map_err(|_| invalid(key, format!("expected milliseconds, got '{value}'")))?;
    if millis == 0 {
        return Err(invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod config_test;
