//! AssistantBackend trait — the abstraction over the hosted assistant service.
//!
//! The hosted service owns three constructs: an *assistant* (model,
//! instructions, declared tools), a *thread* (conversation history), and a
//! *run* (one execution of the assistant against a thread). The relay drives
//! them through this trait without knowing which service sits behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::AssistantError;
use crate::tool::{ToolCall, ToolDefinition};

/// Everything needed to create an assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSpec {
    /// Display name (e.g., "AO Cook")
    pub name: String,

    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// System instructions
    pub instructions: String,

    /// Tools the assistant may call during a run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether the run can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,

    pub status: RunStatus,

    /// Tool calls the assistant is waiting on (only when `requires_action`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_tool_calls: Vec<ToolCall>,

    /// Service-reported failure reason, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// The output of one tool call, submitted back to a waiting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// The first content part of the assistant's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyContent {
    /// Plain text
    Text { value: String },
    /// Anything else (image file, refusal, ...), identified by its type tag
    Other { kind: String },
}

/// The hosted assistant service.
///
/// Implementations: OpenAI Assistants API (v2). Tests use scripted backends.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai").
    fn name(&self) -> &str;

    /// Create an assistant and return its id.
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String, AssistantError>;

    /// Create an empty thread and return its id.
    async fn create_thread(&self) -> Result<String, AssistantError>;

    /// Append a user message to a thread.
    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError>;

    /// Start a run of `assistant_id` on `thread_id`.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError>;

    /// Fetch the current state of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// Hand tool outputs to a run waiting in `requires_action`.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run, AssistantError>;

    /// Ask the service to stop a run; the returned state is usually `cancelling`.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// The first content part of the newest assistant message produced by `run_id`.
    async fn latest_reply(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Option<ReplyContent>, AssistantError>;
}
