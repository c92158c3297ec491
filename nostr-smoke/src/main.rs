// ABOUTME: nostr-smoke - bootstraps the env file, publishes a profile, a note
// ABOUTME: and a random vibe, then exits 0; `--schedule` posts vibes until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nostr_vibe::prelude::*;

const USAGE: &str = "usage: nostr-smoke [--schedule] [--dry-run] [ENV_PATH]";

#[derive(Debug, Default)]
struct Options {
    schedule: bool,
    dry_run: bool,
    env_path: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        for arg in args {
            match arg.as_str() {
                "--schedule" => options.schedule = true,
                "--dry-run" => options.dry_run = true,
                "-h" | "--help" => anyhow::bail!(USAGE),
                flag if flag.starts_with('-') => anyhow::bail!("unknown flag {flag}\n{USAGE}"),
                path if options.env_path.is_none() => options.env_path = Some(path.into()),
                _ => anyhow::bail!(USAGE),
            }
        }
        Ok(options)
    }

    fn env_path(&self) -> PathBuf {
        self.env_path.clone().unwrap_or_else(|| PathBuf::from(".env"))
    }
}

/// Load config and build the publisher the tools will share.
fn build_publisher(options: &Options) -> Result<(NostrConfig, Arc<dyn Publisher>)> {
    let env_path = options.env_path();
    if bootstrap_env_file(&env_path)? {
        info!(path = %env_path.display(), "created env file with default settings");
    }

    let config = NostrConfig::from_env_file(&env_path)?;
    if config.private_key == KeySetting::Generate {
        warn!("no private key configured, using a freshly generated key for this run");
    }

    let publisher: Arc<dyn Publisher> = if options.dry_run {
        Arc::new(MemoryPublisher::new(Keys::from_setting(&config.private_key)?))
    } else {
        Arc::new(NostrClient::from_config(&config)?)
    };
    info!(
        pubkey = %publisher.public_key_hex(),
        relays = config.relays.len(),
        dry_run = options.dry_run,
        "publisher ready"
    );

    Ok((config, publisher))
}

async fn run(options: Options) {
    let (config, publisher) = match build_publisher(&options) {
        Ok(built) => built,
        Err(e) => {
            error!(error = %e, "failed to set up nostr publisher");
            tokio::time::sleep(EXIT_DELAY).await;
            return;
        }
    };

    let registry = Registry::new();
    register_nostr_tools(&registry, publisher).await;

    if options.schedule {
        let scheduler = match VibeScheduler::new(registry, config.post_interval) {
            Ok(scheduler) => scheduler,
            Err(e) => {
                error!(error = %e, "cannot start vibe scheduler");
                return;
            }
        };
        let handle = scheduler.spawn();
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
        }
        let runs = handle.stop().await;
        info!(runs, "scheduler stopped");
        return;
    }

    info!("testing nostr tools");
    let outcome = SmokeRun::new()
        .run_with_exit_delay(&registry, EXIT_DELAY)
        .await;
    if outcome.is_completed() {
        info!("all tests completed");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // wss:// relays need a process-wide TLS crypto provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    match Options::parse(std::env::args().skip(1)) {
        Ok(options) => run(options).await,
        Err(e) => eprintln!("{e}"),
    }

    std::process::exit(0);
}
