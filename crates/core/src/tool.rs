//! Tool trait — the abstraction over assistant capabilities.
//!
//! Tools are what the hosted assistant can call back into during a run:
//! search the documentation, fetch an example, explain a concept.
//! Every tool declares a JSON Schema for its parameters and the registry
//! checks arguments against it before the tool sees them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ToolError;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the assistant's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// Build a result from a serializable payload. The payload is kept as
    /// structured `data` and rendered as JSON text in `output`.
    pub fn from_payload<T: Serialize>(success: bool, payload: &T) -> Self {
        let data = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
        Self {
            call_id: String::new(),
            success,
            output: data.to_string(),
            data: Some(data),
        }
    }
}

/// A tool definition sent to the assistant so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core Tool trait.
///
/// Each tool (searchDocs, getExample, explainConcept) implements this trait.
/// Tools are registered in the ToolRegistry and exposed to the assistant.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "searchDocs").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the assistant).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the assistant.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Check `arguments` against an object schema.
///
/// Covers the subset of JSON Schema the tools declare: an object with
/// `properties`, `required`, string `type`s, and string `enum`s.
/// Undeclared properties are ignored; optional properties may be `null`.
pub fn validate_arguments(
    schema: &serde_json::Value,
    arguments: &serde_json::Value,
) -> Result<(), ToolError> {
    let args = arguments
        .as_object()
        .ok_or_else(|| ToolError::InvalidArguments("arguments must be a JSON object".into()))?;

    if let Some(required) = schema["required"].as_array() {
        for name in required.iter().filter_map(|n| n.as_str()) {
            if args.get(name).is_none_or(|v| v.is_null()) {
                return Err(ToolError::InvalidArguments(format!(
                    "Missing '{name}' argument"
                )));
            }
        }
    }

    let Some(properties) = schema["properties"].as_object() else {
        return Ok(());
    };

    for (name, value) in args {
        let Some(prop) = properties.get(name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        if prop["type"].as_str() == Some("string") && !value.is_string() {
            return Err(ToolError::InvalidArguments(format!(
                "'{name}' must be a string"
            )));
        }

        if let Some(allowed) = prop["enum"].as_array() {
            if !allowed.contains(value) {
                let options: Vec<&str> = allowed.iter().filter_map(|v| v.as_str()).collect();
                return Err(ToolError::InvalidArguments(format!(
                    "'{name}' must be one of: {}",
                    options.join(", ")
                )));
            }
        }
    }

    Ok(())
}

/// A registry of available tools.
///
/// The relay uses this to:
/// 1. Get tool definitions to declare on the assistant
/// 2. Validate and execute tool calls the assistant requests
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Validate a tool call against the tool's schema, then execute it.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self.tools.get(&call.name).ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        validate_arguments(&tool.parameters_schema(), &call.arguments)?;
        let mut result = tool.execute(call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// List all registered tool names, ordered.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "tone": { "type": "string", "enum": ["plain", "loud"] }
                },
                "required": ["text"]
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: text,
                data: None,
            })
        }
    }

    fn call(args: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: args,
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(defs[0].parameters["required"][0], "text");
    }

    #[tokio::test]
    async fn registry_execute_sets_call_id() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let result = registry.execute(&call(serde_json::json!({"text": "hello world"}))).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute(&call(serde_json::json!({}))).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn registry_rejects_invalid_arguments_before_execution() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let err = registry
            .execute(&call(serde_json::json!({"text": "hi", "tone": "whisper"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn validation_requires_declared_fields() {
        let schema = EchoTool.parameters_schema();
        let err = validate_arguments(&schema, &serde_json::json!({})).unwrap_err();
        assert!(err.to_string().contains("Missing 'text'"));

        let err = validate_arguments(&schema, &serde_json::json!({"text": null})).unwrap_err();
        assert!(err.to_string().contains("Missing 'text'"));
    }

    #[test]
    fn validation_checks_types_and_enums() {
        let schema = EchoTool.parameters_schema();
        assert!(validate_arguments(&schema, &serde_json::json!({"text": 42})).is_err());
        assert!(validate_arguments(&schema, &serde_json::json!({"text": "a", "tone": "loud"})).is_ok());

        let err = validate_arguments(&schema, &serde_json::json!({"text": "a", "tone": "soft"})).unwrap_err();
        assert!(err.to_string().contains("plain, loud"));
    }

    #[test]
    fn validation_allows_null_optionals_and_extra_fields() {
        let schema = EchoTool.parameters_schema();
        let args = serde_json::json!({"text": "a", "tone": null, "unknown": 1});
        assert!(validate_arguments(&schema, &args).is_ok());
    }

    #[test]
    fn validation_rejects_non_objects() {
        let schema = EchoTool.parameters_schema();
        assert!(validate_arguments(&schema, &serde_json::json!("text")).is_err());
        assert!(validate_arguments(&schema, &serde_json::Value::Null).is_err());
    }

    #[test]
    fn result_from_payload_keeps_both_forms() {
        let result = ToolResult::from_payload(false, &serde_json::json!({"error": "x"}));
        assert!(!result.success);
        assert_eq!(result.output, r#"{"error":"x"}"#);
        assert_eq!(result.data.unwrap()["error"], "x");
    }
}
