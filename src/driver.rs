// ABOUTME: Smoke-run driver - publishes a profile, a note and a random vibe in
// ABOUTME: order, stops at the first failing step, then waits before exit.

use std::fmt;
use std::time::Duration;

use tracing::{error, info};

use crate::error::ToolError;
use crate::tool::{Registry, ToolResult};
use crate::tools::{PUBLISH_NOTE, PUBLISH_PROFILE, PUBLISH_RANDOM_VIBE};

/// Pause before exit so in-flight relay traffic can flush.
pub const EXIT_DELAY: Duration = Duration::from_secs(2);

/// One stage of the smoke run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Profile,
    Note,
    Vibe,
}

impl Step {
    /// Execution order.
    pub const ALL: [Step; 3] = [Step::Profile, Step::Note, Step::Vibe];

    pub fn tool_name(self) -> &'static str {
        match self {
            Step::Profile => PUBLISH_PROFILE,
            Step::Note => PUBLISH_NOTE,
            Step::Vibe => PUBLISH_RANDOM_VIBE,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Profile => write!(f, "profile"),
            Step::Note => write!(f, "note"),
            Step::Vibe => write!(f, "vibe"),
        }
    }
}

/// The step that failed and why.
#[derive(Debug, thiserror::Error)]
#[error("{step} step failed: {source}")]
pub struct StepError {
    pub step: Step,
    #[source]
    pub source: ToolError,
}

/// Results of a fully successful run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct SequenceReport {
    pub steps: Vec<(Step, ToolResult)>,
}

impl SequenceReport {
    pub fn result(&self, step: Step) -> Option<&ToolResult> {
        self.steps.iter().find(|(s, _)| *s == step).map(|(_, r)| r)
    }
}

/// How a run with exit delay ended. The process exit code is 0 either way.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(SequenceReport),
    Failed(StepError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// Arguments for each step of a smoke run.
#[derive(Debug, Clone)]
pub struct SmokeRun {
    profile: serde_json::Value,
    note: serde_json::Value,
}

impl Default for SmokeRun {
    fn default() -> Self {
        Self {
            profile: serde_json::json!({
                "name": "Dr. Bitcoin",
                "about": "I am a doctor of bitcoin, here to help with all your Bitcoin needs!",
                "picture": "https://i.imgur.com/K3KJ3w4h.jpg",
                "nip05": "drbitcoin@example.com",
                "website": "https://example.com",
                "lud16": "drbitcoin@getalby.com"
            }),
            note: serde_json::json!({
                "content": "Hello Nostr world! This is Dr. Bitcoin testing the Nostr integration."
            }),
        }
    }
}

impl SmokeRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: serde_json::Value) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_note(mut self, content: impl Into<String>) -> Self {
        self.note = serde_json::json!({ "content": content.into() });
        self
    }

    fn args(&self, step: Step) -> serde_json::Value {
        match step {
            Step::Profile => self.profile.clone(),
            Step::Note => self.note.clone(),
            Step::Vibe => serde_json::json!({}),
        }
    }

    /// Run the steps one after another. Each step starts only after the
    /// previous one resolved; the first failure ends the run.
    pub async fn run_sequence(&self, registry: &Registry) -> Result<SequenceReport, StepError> {
        let mut report = SequenceReport::default();

        for step in Step::ALL {
            info!(%step, tool = step.tool_name(), "running step");
            let result = registry
                .execute(step.tool_name(), self.args(step))
                .await
                .map_err(|source| StepError { step, source })?;

            info!(%step, %result, "step finished");
            report.steps.push((step, result));
        }

        info!("all steps completed");
        Ok(report)
    }

    /// Run the sequence, log how it ended, then wait `delay`. Never fails.
    pub async fn run_with_exit_delay(&self, registry: &Registry, delay: Duration) -> RunOutcome {
        let outcome = match self.run_sequence(registry).await {
            Ok(report) => RunOutcome::Completed(report),
            Err(e) => {
                error!(
                    step = %e.step,
                    unknown_tool = e.source.is_not_found(),
                    error = %e,
                    "smoke run failed"
                );
                RunOutcome::Failed(e)
            }
        };

        tokio::time::sleep(delay).await;
        info!("smoke run finished, exiting");
        outcome
    }
}
