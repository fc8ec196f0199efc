//! `searchDocs` — ranked search over the documentation.

use std::path::PathBuf;

use aocook_core::error::ToolError;
use aocook_core::tool::{Tool, ToolResult};
use aocook_knowledge::{KnowledgeBase, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::params::{Category, unavailable_message};

pub struct SearchDocsTool {
    docs_path: PathBuf,
}

impl SearchDocsTool {
    pub fn new(docs_path: impl Into<PathBuf>) -> Self {
        Self {
            docs_path: docs_path.into(),
        }
    }
}

#[derive(Deserialize)]
struct SearchDocsArgs {
    query: String,
    #[serde(default)]
    category: Option<Category>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchDocsResponse {
    results: Vec<SearchResult>,
    total_found: usize,
    query: String,
    category: &'static str,
}

#[derive(Serialize)]
struct Unavailable {
    error: String,
    results: Vec<SearchResult>,
}

#[async_trait]
impl Tool for SearchDocsTool {
    fn name(&self) -> &str {
        "searchDocs"
    }

    fn description(&self) -> &str {
        "Search through the AO blockchain documentation for specific topics or keywords"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query or keywords to look for in the documentation"
                },
                "category": {
                    "type": "string",
                    "description": "Optional category to narrow down the search (e.g., \"concepts\", \"examples\", \"sections\")",
                    "enum": Category::VALUES
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SearchDocsArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let kb = match KnowledgeBase::load(&self.docs_path) {
            Ok(kb) => kb,
            Err(_) => {
                return Ok(ToolResult::from_payload(
                    false,
                    &Unavailable {
                        error: unavailable_message(&self.docs_path),
                        results: Vec::new(),
                    },
                ));
            }
        };

        let category = args.category.unwrap_or(Category::All);
        let results = kb.search(&args.query, Some(category.as_str()));
        tracing::debug!(query = %args.query, category = category.as_str(), hits = results.len(), "searchDocs");

        Ok(ToolResult::from_payload(
            true,
            &SearchDocsResponse {
                total_found: results.len(),
                results,
                query: args.query,
                category: category.as_str(),
            },
        ))
    }
}
