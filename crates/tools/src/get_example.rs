//! `getExample` — best-matching example for a topic.

use std::path::PathBuf;

use aocook_core::error::ToolError;
use aocook_core::tool::{Tool, ToolResult};
use aocook_knowledge::{ALL_CATEGORIES, KnowledgeBase};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::params::{Category, Complexity, MAX_RELATED, unavailable_message};

pub struct GetExampleTool {
    docs_path: PathBuf,
}

impl GetExampleTool {
    pub fn new(docs_path: impl Into<PathBuf>) -> Self {
        Self {
            docs_path: docs_path.into(),
        }
    }
}

#[derive(Deserialize)]
struct GetExampleArgs {
    topic: String,
    #[serde(default)]
    complexity: Option<Complexity>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GetExampleResponse {
    Found {
        example: String,
        /// Path of the matched leaf
        explanation: String,
        complexity: &'static str,
    },
    Missing {
        example: Option<String>,
        explanation: String,
        suggestions: Option<Vec<String>>,
    },
    Unavailable {
        error: String,
        example: Option<String>,
        explanation: Option<String>,
    },
}

#[async_trait]
impl Tool for GetExampleTool {
    fn name(&self) -> &str {
        "getExample"
    }

    fn description(&self) -> &str {
        "Retrieve specific code examples from the AO blockchain documentation"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic or concept you want an example for"
                },
                "complexity": {
                    "type": "string",
                    "description": "The complexity level of the example",
                    "enum": Complexity::VALUES
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: GetExampleArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let Ok(kb) = KnowledgeBase::load(&self.docs_path) else {
            return Ok(ToolResult::from_payload(
                false,
                &GetExampleResponse::Unavailable {
                    error: unavailable_message(&self.docs_path),
                    example: None,
                    explanation: None,
                },
            ));
        };

        let level = args.complexity.map(Complexity::as_str);
        let query = format!("{} example {}", args.topic, level.unwrap_or_default());
        let results = kb.search(&query, Some(Category::Examples.as_str()));

        let response = match results.into_iter().next() {
            Some(best) => GetExampleResponse::Found {
                example: best.content,
                explanation: best.path,
                complexity: level.unwrap_or(Complexity::Basic.as_str()),
            },
            None => {
                let suggestions: Vec<String> = kb
                    .search(&args.topic, Some(ALL_CATEGORIES))
                    .into_iter()
                    .take(MAX_RELATED)
                    .map(|r| r.path)
                    .collect();
                tracing::debug!(topic = %args.topic, suggestions = suggestions.len(), "No example matched");

                GetExampleResponse::Missing {
                    example: None,
                    explanation: format!(
                        "No examples found for \"{}\" with complexity {}.",
                        args.topic,
                        level.unwrap_or("any")
                    ),
                    suggestions: (!suggestions.is_empty()).then_some(suggestions),
                }
            }
        };

        Ok(ToolResult::from_payload(true, &response))
    }
}
