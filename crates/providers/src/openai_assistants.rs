//! OpenAI Assistants API (v2) backend.
//!
//! Supports:
//! - Assistant creation with function tools
//! - Threads, user messages and runs
//! - Run polling and tool output submission
//! - Reading the newest reply produced by a run

use std::time::Duration;

use aocook_config::AppConfig;
use aocook_core::assistant::{AssistantBackend, AssistantSpec, ReplyContent, Run, RunStatus, ToolOutput};
use aocook_core::error::AssistantError;
use aocook_core::tool::{ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-request HTTP timeout. Run polling has its own, longer deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A client for the OpenAI Assistants API.
pub struct OpenAiAssistants {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiAssistants {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Build from configuration. Fails when no API key is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AssistantError::NotConfigured(
                    "no API key; set AOCOOK_API_KEY or OPENAI_API_KEY".into(),
                )
            })?;
        Ok(Self::new(&config.api_url, api_key))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorized(self.client.post(self.url(path)))
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorized(self.client.get(self.url(path)))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Send a request and decode a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AssistantError> {
        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(format!("Failed to parse response: {e}")))
    }
}

/// Map a non-success HTTP status to an error.
fn status_error(status: u16, body: String) -> AssistantError {
    match status {
        429 => AssistantError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => AssistantError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        _ => {
            warn!(status, body = %body, "Assistant service returned error");
            AssistantError::ApiError {
                status_code: status,
                message: body,
            }
        }
    }
}

#[async_trait]
impl AssistantBackend for OpenAiAssistants {
    fn name(&self) -> &str {
        "openai"
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String, AssistantError> {
        let body = ApiAssistantRequest {
            name: &spec.name,
            instructions: &spec.instructions,
            model: &spec.model,
            tools: spec.tools.iter().map(ApiToolDefinition::from).collect(),
        };
        debug!(model = %spec.model, tools = spec.tools.len(), "Creating assistant");

        let created: ApiObject = self.send(self.post("/assistants").json(&body)).await?;
        Ok(created.id)
    }

    async fn create_thread(&self) -> Result<String, AssistantError> {
        let created: ApiObject = self
            .send(self.post("/threads").json(&serde_json::json!({})))
            .await?;
        Ok(created.id)
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError> {
        let body = serde_json::json!({ "role": "user", "content": content });
        let _: ApiObject = self
            .send(self.post(&format!("/threads/{thread_id}/messages")).json(&body))
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError> {
        let body = serde_json::json!({ "assistant_id": assistant_id });
        let run: ApiRun = self
            .send(self.post(&format!("/threads/{thread_id}/runs")).json(&body))
            .await?;
        Ok(run.into())
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let run: ApiRun = self
            .send(self.get(&format!("/threads/{thread_id}/runs/{run_id}")))
            .await?;
        Ok(run.into())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run, AssistantError> {
        let body = serde_json::json!({ "tool_outputs": outputs });
        let run: ApiRun = self
            .send(
                self.post(&format!(
                    "/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
                ))
                .json(&body),
            )
            .await?;
        Ok(run.into())
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let run: ApiRun = self
            .send(self.post(&format!("/threads/{thread_id}/runs/{run_id}/cancel")))
            .await?;
        Ok(run.into())
    }

    async fn latest_reply(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Option<ReplyContent>, AssistantError> {
        let request = self
            .get(&format!("/threads/{thread_id}/messages"))
            .query(&[("run_id", run_id), ("order", "desc"), ("limit", "1")]);
        let list: ApiMessageList = self.send(request).await?;
        Ok(list.first_content())
    }
}

// --- Assistants API wire types ---

#[derive(Serialize)]
struct ApiAssistantRequest<'a> {
    name: &'a str,
    instructions: &'a str,
    model: &'a str,
    tools: Vec<ApiToolDefinition<'a>>,
}

#[derive(Serialize)]
struct ApiToolDefinition<'a> {
    r#type: &'static str,
    function: ApiToolFunction<'a>,
}

#[derive(Serialize)]
struct ApiToolFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

impl<'a> From<&'a ToolDefinition> for ApiToolDefinition<'a> {
    fn from(def: &'a ToolDefinition) -> Self {
        Self {
            r#type: "function",
            function: ApiToolFunction {
                name: &def.name,
                description: &def.description,
                parameters: &def.parameters,
            },
        }
    }
}

#[derive(Deserialize)]
struct ApiObject {
    id: String,
}

#[derive(Deserialize)]
struct ApiRun {
    id: String,
    status: RunStatus,
    #[serde(default)]
    required_action: Option<ApiRequiredAction>,
    #[serde(default)]
    last_error: Option<ApiLastError>,
}

#[derive(Deserialize)]
struct ApiRequiredAction {
    submit_tool_outputs: ApiSubmitToolOutputs,
}

#[derive(Deserialize)]
struct ApiSubmitToolOutputs {
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Deserialize)]
struct ApiToolCall {
    id: String,
    function: ApiFunction,
}

#[derive(Deserialize)]
struct ApiFunction {
    name: String,
    /// JSON-encoded argument object, exactly as the model produced it
    arguments: String,
}

#[derive(Deserialize)]
struct ApiLastError {
    message: String,
}

impl From<ApiRun> for Run {
    fn from(run: ApiRun) -> Self {
        let required_tool_calls = run
            .required_action
            .map(|action| {
                action
                    .submit_tool_outputs
                    .tool_calls
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        arguments: serde_json::Value::String(tc.function.arguments),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Run {
            id: run.id,
            status: run.status,
            required_tool_calls,
            last_error: run.last_error.map(|e| e.message),
        }
    }
}

#[derive(Deserialize)]
struct ApiMessageList {
    data: Vec<ApiMessage>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Vec<serde_json::Value>,
}

impl ApiMessageList {
    fn first_content(self) -> Option<ReplyContent> {
        let part = self.data.into_iter().next()?.content.into_iter().next()?;
        let kind = part["type"].as_str().unwrap_or_default();
        if kind == "text" {
            let value = part["text"]["value"].as_str().unwrap_or_default();
            Some(ReplyContent::Text {
                value: value.to_string(),
            })
        } else {
            Some(ReplyContent::Other {
                kind: kind.to_string(),
            })
        }
    }
}
