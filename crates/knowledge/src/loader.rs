//! Knowledge base loader.
//!
//! No caching and no partial loads: each call reads and parses the whole
//! file, and any failure is total.

use std::path::Path;

use aocook_core::error::KnowledgeError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::search::{self, Query, SearchResult};

/// An in-memory documentation tree.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    root: Value,
}

impl KnowledgeBase {
    /// Read and parse the knowledge base at `path`.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Knowledge base unavailable");
            KnowledgeError::Unavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let root: Value = serde_json::from_str(&raw).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Knowledge base is not valid JSON");
            KnowledgeError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        debug!(path = %path.display(), bytes = raw.len(), "Knowledge base loaded");
        Ok(Self { root })
    }

    /// Wrap an already parsed tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Search the tree, optionally within one top-level grouping.
    pub fn search(&self, text: &str, category: Option<&str>) -> Vec<SearchResult> {
        search::search(&self.root, &Query::parse(text, category))
    }

    /// Number of searchable string leaves under each top-level key, in file order.
    pub fn stats(&self) -> Vec<(String, usize)> {
        match &self.root {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), count_leaves(value)))
                .collect(),
            other => vec![(String::new(), count_leaves(other))],
        }
    }
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::String(_) => 1,
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        _ => 0,
    }
}
