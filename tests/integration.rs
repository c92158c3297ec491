// ABOUTME: Integration tests verifying config, tools, registry, client and
// ABOUTME: driver work together, against memory and local WebSocket relays.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use nostr_vibe::prelude::*;

/// Local relay that accepts every event and records what it saw.
async fn spawn_recording_relay() -> (String, Arc<Mutex<Vec<Event>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Arc<Mutex<Vec<Event>>> = Arc::default();
    let relay_seen = Arc::clone(&seen);

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let seen = Arc::clone(&relay_seen);
            tokio::spawn(async move {
                let mut ws = accept_async(tcp).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else { continue };
                    let frame: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                    let event: Event = serde_json::from_value(frame[1].clone()).unwrap();
                    let ok = serde_json::json!(["OK", event.id, true, ""]);
                    seen.lock().unwrap().push(event);
                    ws.send(Message::Text(ok.to_string().into())).await.unwrap();
                }
            });
        }
    });

    (format!("ws://{addr}"), seen)
}

#[tokio::test]
async fn test_each_tool_succeeds_with_well_formed_arguments() {
    let registry = Registry::new();
    let publisher = Arc::new(MemoryPublisher::new(Keys::generate()));
    register_nostr_tools(&registry, publisher.clone()).await;

    let profile = registry
        .execute(PUBLISH_PROFILE, serde_json::json!({"name": "Dr. Bitcoin"}))
        .await
        .expect("profile should publish");
    let note = registry
        .execute(PUBLISH_NOTE, serde_json::json!({"content": "gm"}))
        .await
        .expect("note should publish");
    let vibe = registry
        .execute(PUBLISH_RANDOM_VIBE, serde_json::json!({}))
        .await
        .expect("vibe should publish");

    for result in [&profile, &note, &vibe] {
        assert!(!result.is_error);
        assert_eq!(result.metadata_str("pubkey"), Some(publisher.public_key_hex().as_str()));
    }

    let published = publisher.published();
    assert_eq!(published.len(), 3);
    assert!(published.iter().all(|e| e.verify().unwrap()));
}

#[tokio::test]
async fn test_unknown_tool_differs_from_handler_failure() {
    let registry = Registry::new();
    register_nostr_tools(&registry, Arc::new(MemoryPublisher::new(Keys::generate()))).await;

    let unknown = registry
        .execute("publish_nostr_article", serde_json::json!({}))
        .await
        .unwrap_err();
    let handler = registry
        .execute(PUBLISH_NOTE, serde_json::json!({"content": ""}))
        .await
        .unwrap_err();

    assert!(matches!(unknown, ToolError::NotFound(_)));
    assert!(matches!(handler, ToolError::Execution { ref tool, .. } if tool == PUBLISH_NOTE));
}

#[tokio::test(start_paused = true)]
async fn test_smoke_run_end_to_end_with_memory_publisher() {
    let registry = Registry::new();
    let publisher = Arc::new(MemoryPublisher::new(Keys::generate()));
    register_nostr_tools(&registry, publisher.clone()).await;

    let start = tokio::time::Instant::now();
    let outcome = SmokeRun::new().run_with_exit_delay(&registry, EXIT_DELAY).await;
    assert!(start.elapsed() >= EXIT_DELAY);

    let RunOutcome::Completed(report) = outcome else {
        panic!("smoke run should complete");
    };
    let steps: Vec<_> = report.steps.iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, vec![Step::Profile, Step::Note, Step::Vibe]);

    let kinds: Vec<_> = publisher.published().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![0, 1, 1]);
}

#[tokio::test]
async fn test_smoke_run_against_local_relay_from_env_file() {
    let (relay_url, seen) = spawn_recording_relay().await;

    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        format!(
            "# local relay\nNOSTR_PRIVATE_KEY=your_private_key_here\nRELAYS={relay_url}\nPOST_INTERVAL=1000\nPUBLISH_TIMEOUT=5000\n"
        ),
    )
    .unwrap();
    assert!(!bootstrap_env_file(&env_path).unwrap());

    let config = NostrConfig::from_env_file(&env_path).unwrap();
    assert_eq!(config.private_key, KeySetting::Generate);
    assert_eq!(config.post_interval, Duration::from_secs(1));

    let client = Arc::new(NostrClient::from_config(&config).unwrap());
    let registry = Registry::new();
    register_nostr_tools(&registry, client.clone()).await;

    let report = SmokeRun::new().run_sequence(&registry).await.unwrap();
    let note = report.result(Step::Note).unwrap();
    assert_eq!(note.metadata["accepted_relays"].as_array().unwrap().len(), 1);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].kind, 0);
    assert!(seen[1].content.starts_with("Hello Nostr world!"));
    assert!(seen.iter().all(|e| e.pubkey == client.public_key_hex()));
    assert!(seen.iter().all(|e| e.verify().unwrap()));

    client.disconnect_all().await;
}

#[tokio::test]
async fn test_unreachable_relay_fails_the_first_step_only() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = NostrClient::new(
        Keys::generate(),
        vec![url::Url::parse(&format!("ws://{addr}")).unwrap()],
        Duration::from_secs(2),
    );
    let registry = Registry::new();
    register_nostr_tools(&registry, Arc::new(client)).await;

    let err = SmokeRun::new().run_sequence(&registry).await.unwrap_err();
    assert_eq!(err.step, Step::Profile);
    assert!(!err.source.is_not_found());
}

#[tokio::test]
async fn test_definitions_describe_nostr_tools() {
    let registry = Registry::new();
    register_nostr_tools(&registry, Arc::new(MemoryPublisher::new(Keys::generate()))).await;

    let defs = registry.definitions().await;
    let note = defs.iter().find(|d| d.name == PUBLISH_NOTE).unwrap();
    assert_eq!(note.input_schema["required"], serde_json::json!(["content"]));
    let profile = defs.iter().find(|d| d.name == PUBLISH_PROFILE).unwrap();
    assert!(profile.input_schema["properties"]["lud16"].is_object());
}
