// ABOUTME: Tests for env file bootstrap and NostrConfig parsing.

use std::time::Duration;

use super::*;

#[test]
fn test_bootstrap_creates_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");

    assert!(bootstrap_env_file(&path).unwrap());

    let written = std::fs::read_to_string(&path).unwrap();
    let keys: Vec<_> = written
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('=').map(|(k, _)| k))
        .collect();
    assert_eq!(keys, vec![KEY_PRIVATE_KEY, KEY_RELAYS, KEY_POST_INTERVAL]);
}

#[test]
fn test_bootstrap_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "RELAYS=wss://relay.example.com\n").unwrap();

    assert!(!bootstrap_env_file(&path).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "RELAYS=wss://relay.example.com\n"
    );
}

#[test]
fn test_bootstrap_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test").join(".env");

    assert!(bootstrap_env_file(&path).unwrap());
    assert!(path.exists());
}

#[test]
fn test_template_round_trips_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    bootstrap_env_file(&path).unwrap();

    let config = NostrConfig::from_env_file(&path).unwrap();
    assert_eq!(config, NostrConfig::default());
}

#[test]
fn test_from_env_file_leaves_process_env_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "NOSTR_VIBE_TEST_ONLY_KEY=1\nPOST_INTERVAL=5000\n").unwrap();

    let config = NostrConfig::from_env_file(&path).unwrap();
    assert_eq!(config.post_interval, Duration::from_secs(5));
    assert!(std::env::var("NOSTR_VIBE_TEST_ONLY_KEY").is_err());
}

#[test]
fn test_from_pairs_parses_values() {
    let config = NostrConfig::from_pairs([
        (KEY_PRIVATE_KEY, "ab".repeat(32)),
        (KEY_RELAYS, " wss://a.example , ,ws://localhost:7777 ".to_string()),
        (KEY_POST_INTERVAL, "60000".to_string()),
        (KEY_PUBLISH_TIMEOUT, "2500".to_string()),
    ])
    .unwrap();

    assert_eq!(config.private_key, KeySetting::Hex("ab".repeat(32)));
    assert_eq!(config.relays.len(), 2);
    assert_eq!(config.relays[0].as_str(), "wss://a.example/");
    assert_eq!(config.relays[1].as_str(), "ws://localhost:7777/");
    assert_eq!(config.post_interval, Duration::from_secs(60));
    assert_eq!(config.publish_timeout, Duration::from_millis(2500));
}

#[test]
fn test_placeholder_or_empty_key_means_generate() {
    let config = NostrConfig::from_pairs([(KEY_PRIVATE_KEY, PLACEHOLDER_PRIVATE_KEY)]).unwrap();
    assert_eq!(config.private_key, KeySetting::Generate);

    let config = NostrConfig::from_pairs([(KEY_PRIVATE_KEY, "")]).unwrap();
    assert_eq!(config.private_key, KeySetting::Generate);
}

#[test]
fn test_invalid_interval() {
    let err = NostrConfig::from_pairs([(KEY_POST_INTERVAL, "hourly")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == KEY_POST_INTERVAL));

    let err = NostrConfig::from_pairs([(KEY_POST_INTERVAL, "0")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_relays_must_be_websocket() {
    let err = parse_relays("https://relay.example.com").unwrap_err();
    assert!(err.to_string().contains("ws://"));

    assert!(parse_relays("not a url").is_err());
}

#[test]
fn test_key_setting_debug_redacts() {
    let setting = KeySetting::Hex("deadbeef".to_string());
    assert_eq!(format!("{setting:?}"), "Hex(<redacted>)");
}

#[test]
fn test_concurrent_bootstrap_creates_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");

    let created: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| bootstrap_env_file(&path).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(created, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), ENV_TEMPLATE);
}

#[test]
fn test_bootstrap_keeps_empty_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "").unwrap();

    assert!(!bootstrap_env_file(&path).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}
