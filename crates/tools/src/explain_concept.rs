//! `explainConcept` — concept text at a chosen level of detail.

use std::path::PathBuf;

use aocook_core::error::ToolError;
use aocook_core::tool::{Tool, ToolResult};
use aocook_knowledge::{ALL_CATEGORIES, KnowledgeBase, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::params::{Category, Detail, MAX_RELATED, first_sentence, preview, unavailable_message};

pub struct ExplainConceptTool {
    docs_path: PathBuf,
}

impl ExplainConceptTool {
    pub fn new(docs_path: impl Into<PathBuf>) -> Self {
        Self {
            docs_path: docs_path.into(),
        }
    }
}

#[derive(Deserialize)]
struct ExplainConceptArgs {
    concept: String,
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Serialize)]
struct RelatedConcept {
    concept: String,
    preview: String,
}

#[derive(Serialize)]
struct RelatedTopic {
    topic: String,
    preview: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ExplainConceptResponse {
    #[serde(rename_all = "camelCase")]
    Concept {
        explanation: String,
        source: String,
        related_concepts: Option<Vec<RelatedConcept>>,
    },
    #[serde(rename_all = "camelCase")]
    General {
        explanation: Option<String>,
        related_topics: Option<Vec<RelatedTopic>>,
    },
    Unavailable {
        error: String,
        explanation: Option<String>,
    },
}

/// Entries after the best match, at most [`MAX_RELATED`]; `None` when there are none.
fn related<T>(results: &[SearchResult], build: impl Fn(&SearchResult) -> T) -> Option<Vec<T>> {
    let rest: Vec<T> = results.iter().skip(1).take(MAX_RELATED).map(build).collect();
    (!rest.is_empty()).then_some(rest)
}

#[async_trait]
impl Tool for ExplainConceptTool {
    fn name(&self) -> &str {
        "explainConcept"
    }

    fn description(&self) -> &str {
        "Get detailed explanations of AO blockchain concepts and terminology"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "concept": {
                    "type": "string",
                    "description": "The concept or term to explain"
                },
                "detail": {
                    "type": "string",
                    "description": "The level of detail required in the explanation",
                    "enum": Detail::VALUES
                }
            },
            "required": ["concept"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: ExplainConceptArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let Ok(kb) = KnowledgeBase::load(&self.docs_path) else {
            return Ok(ToolResult::from_payload(
                false,
                &ExplainConceptResponse::Unavailable {
                    error: unavailable_message(&self.docs_path),
                    explanation: None,
                },
            ));
        };

        let concepts = kb.search(&args.concept, Some(Category::Concepts.as_str()));

        let response = match concepts.first() {
            Some(best) => {
                let explanation = match args.detail.unwrap_or(Detail::Detailed) {
                    Detail::Brief => first_sentence(&best.content),
                    Detail::Detailed | Detail::Technical => best.content.clone(),
                };
                ExplainConceptResponse::Concept {
                    explanation,
                    source: best.path.clone(),
                    related_concepts: related(&concepts, |r| RelatedConcept {
                        concept: r.path.clone(),
                        preview: preview(&r.content),
                    }),
                }
            }
            None => {
                // Not a named concept; fall back to the whole tree.
                let general = kb.search(&args.concept, Some(ALL_CATEGORIES));
                tracing::debug!(concept = %args.concept, hits = general.len(), "Concept fallback search");
                ExplainConceptResponse::General {
                    explanation: general.first().map(|r| r.content.clone()),
                    related_topics: related(&general, |r| RelatedTopic {
                        topic: r.path.clone(),
                        preview: preview(&r.content),
                    }),
                }
            }
        };

        Ok(ToolResult::from_payload(true, &response))
    }
}
