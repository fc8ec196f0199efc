//! The chat relay: one user message in, one assistant reply out.

use std::sync::Arc;
use std::time::Duration;

use aocook_config::AppConfig;
use aocook_core::assistant::{AssistantBackend, AssistantSpec, ReplyContent, Run, RunStatus, ToolOutput};
use aocook_core::error::{AssistantError, ToolError};
use aocook_core::session::ChatSession;
use aocook_core::tool::{ToolCall, ToolRegistry};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::prompt;

/// Returned to the user whenever a run ends without a usable text reply.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request.";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant answered with text.
    Reply(String),
    /// The run ended with `status`, but produced no text reply.
    Fallback { status: RunStatus },
}

impl TurnOutcome {
    /// The text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Reply(text) => text,
            TurnOutcome::Fallback { .. } => FALLBACK_REPLY,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TurnOutcome::Reply(text) => text,
            TurnOutcome::Fallback { .. } => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Drives turns against a hosted assistant, servicing tool calls locally.
pub struct ChatRelay {
    backend: Arc<dyn AssistantBackend>,

    tools: Arc<ToolRegistry>,

    /// What to create on first use
    spec: AssistantSpec,

    /// Set once the assistant exists; a failed creation leaves it unset
    assistant_id: OnceCell<String>,

    poll_interval: Duration,

    run_timeout: Duration,
}

impl ChatRelay {
    /// Create a relay. The assistant declares every tool in `tools`.
    pub fn new(
        backend: Arc<dyn AssistantBackend>,
        tools: Arc<ToolRegistry>,
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        let spec = AssistantSpec {
            name: name.into(),
            model: model.into(),
            instructions: instructions.into(),
            tools: tools.definitions(),
        };
        Self {
            backend,
            tools,
            spec,
            assistant_id: OnceCell::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    /// Build a relay with the documentation tools and configured assistant.
    pub fn from_config(config: &AppConfig, backend: Arc<dyn AssistantBackend>) -> Self {
        let tools = Arc::new(aocook_tools::default_registry(&config.knowledge.path));
        Self::new(
            backend,
            tools,
            &config.assistant.name,
            &config.assistant.model,
            prompt::instructions(&config.assistant),
        )
        .with_polling(config.assistant.poll_interval(), config.assistant.run_timeout())
    }

    /// Set the delay between run checks and the overall run deadline.
    pub fn with_polling(mut self, poll_interval: Duration, run_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.run_timeout = run_timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    async fn assistant_id(&self) -> Result<&str, AssistantError> {
        let id = self
            .assistant_id
            .get_or_try_init(|| async {
                let id = self.backend.create_assistant(&self.spec).await?;
                info!(
                    backend = self.backend.name(),
                    assistant_id = %id,
                    model = %self.spec.model,
                    "Assistant created"
                );
                Ok::<_, AssistantError>(id)
            })
            .await?;
        Ok(id.as_str())
    }

    /// Run one turn of `session` with the user's `message`.
    ///
    /// Remote failures and timeouts are errors. A run that ends in any state
    /// other than `completed`, or whose reply is not text, is a
    /// [`TurnOutcome::Fallback`].
    pub async fn send(
        &self,
        session: &mut ChatSession,
        message: &str,
    ) -> aocook_core::Result<TurnOutcome> {
        let assistant_id = self.assistant_id().await?;

        let thread_id = match &session.thread_id {
            Some(id) => id.clone(),
            None => {
                let id = self.backend.create_thread().await?;
                info!(conversation_id = %session.id, thread_id = %id, "Thread created");
                session.thread_id = Some(id.clone());
                id
            }
        };

        debug!(conversation_id = %session.id, thread_id = %thread_id, "Appending user message");
        self.backend.add_user_message(&thread_id, message).await?;

        let run = self.backend.create_run(&thread_id, assistant_id).await?;
        debug!(run_id = %run.id, status = %run.status, "Run started");

        let run_id = run.id.clone();
        let run = match self.wait_for_run(&thread_id, run).await {
            Ok(run) => run,
            Err(e @ AssistantError::Timeout { .. }) => {
                self.abandon_run(session, &thread_id, &run_id).await;
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        session.turns += 1;

        if run.status != RunStatus::Completed {
            warn!(
                run_id = %run.id,
                status = %run.status,
                error = run.last_error.as_deref().unwrap_or(""),
                "Run did not complete"
            );
            return Ok(TurnOutcome::Fallback { status: run.status });
        }

        match self.backend.latest_reply(&thread_id, &run.id).await? {
            Some(ReplyContent::Text { value }) => Ok(TurnOutcome::Reply(value)),
            other => {
                warn!(run_id = %run.id, reply = ?other, "Run completed without a text reply");
                Ok(TurnOutcome::Fallback { status: run.status })
            }
        }
    }

    /// Cancel a run that outlived the deadline so its thread accepts new
    /// messages. When the cancel fails the session moves to a fresh thread.
    async fn abandon_run(&self, session: &mut ChatSession, thread_id: &str, run_id: &str) {
        match self.backend.cancel_run(thread_id, run_id).await {
            Ok(run) => debug!(run_id, status = %run.status, "Run cancelled"),
            Err(e) => {
                warn!(run_id, error = %e, "Could not cancel run; next turn starts a new thread");
                session.thread_id = None;
            }
        }
    }

    /// Wait for `run` to finish, giving up after the run timeout.
    async fn wait_for_run(&self, thread_id: &str, run: Run) -> Result<Run, AssistantError> {
        let run_id = run.id.clone();
        tokio::time::timeout(self.run_timeout, self.poll_run(thread_id, run))
            .await
            .map_err(|_| {
                warn!(run_id = %run_id, "Run timed out");
                AssistantError::Timeout {
                    run_id,
                    timeout_secs: self.run_timeout.as_secs(),
                }
            })?
    }

    /// Poll until terminal, servicing tool requests along the way.
    async fn poll_run(&self, thread_id: &str, mut run: Run) -> Result<Run, AssistantError> {
        loop {
            if run.status.is_terminal() {
                return Ok(run);
            }

            if run.status == RunStatus::RequiresAction && !run.required_tool_calls.is_empty() {
                let outputs = self.run_tool_calls(&run.required_tool_calls).await;
                debug!(run_id = %run.id, outputs = outputs.len(), "Submitting tool outputs");
                run = self
                    .backend
                    .submit_tool_outputs(thread_id, &run.id, outputs)
                    .await?;
                continue;
            }

            tokio::time::sleep(self.poll_interval).await;
            run = self.backend.get_run(thread_id, &run.id).await?;
            debug!(run_id = %run.id, status = %run.status, "Polled run");
        }
    }

    /// Execute every requested call. Failures become `{"error": ...}` outputs
    /// so the assistant can recover.
    async fn run_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            let output = match self.dispatch(call).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool call failed");
                    serde_json::json!({ "error": e.to_string() }).to_string()
                }
            };
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }
        outputs
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let arguments = decode_arguments(&call.arguments)?;
        let call = ToolCall {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments,
        };
        let start = std::time::Instant::now();
        let result = self.tools.execute(&call).await?;
        debug!(
            tool = %call.name,
            success = result.success,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool executed"
        );
        Ok(result.output)
    }
}

/// Tool arguments arrive as a JSON-encoded string; decode it to an object.
fn decode_arguments(raw: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
    match raw {
        serde_json::Value::String(text) if text.trim().is_empty() => Ok(serde_json::json!({})),
        serde_json::Value::String(text) => serde_json::from_str(text)
            .map_err(|e| ToolError::InvalidArguments(format!("arguments are not valid JSON: {e}"))),
        other => Ok(other.clone()),
    }
}
