// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use nostr_vibe::prelude::*;` to get started quickly.

pub use crate::config::{KeySetting, NostrConfig, bootstrap_env_file};
pub use crate::driver::{EXIT_DELAY, RunOutcome, SequenceReport, SmokeRun, Step, StepError};
pub use crate::error::{ConfigError, NostrError, ToolError, VibeError};
pub use crate::nostr::{
    Event, EventTemplate, Keys, MemoryPublisher, NostrClient, ProfileMetadata, PublishReport,
    Publisher,
};
pub use crate::schedule::{ScheduleHandle, VibeScheduler};
pub use crate::tool::{Registry, Tool, ToolDefinition, ToolResult};
pub use crate::tools::{
    PUBLISH_NOTE, PUBLISH_PROFILE, PUBLISH_RANDOM_VIBE, PublishNoteTool, PublishProfileTool,
    PublishRandomVibeTool, register_nostr_tools,
};
