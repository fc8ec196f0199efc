//! Term search over the knowledge base tree.
//!
//! A brute-force depth-first scan: every string leaf is tested against all
//! query terms (case-insensitive, AND semantics). Relevance is the total
//! number of term occurrences in the leaf. Results are ranked by relevance
//! and capped at [`MAX_RESULTS`]; leaves with equal relevance keep document
//! order.

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on results returned from one search.
pub const MAX_RESULTS: usize = 10;

/// Category sentinel meaning "search the whole tree".
pub const ALL_CATEGORIES: &str = "all";

/// A matching leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Dot-joined keys from the traversal root to the leaf
    pub path: String,

    /// The leaf text, unmodified
    pub content: String,

    /// Sum of per-term occurrence counts
    pub relevance: usize,
}

/// A parsed search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
    category: Option<String>,
}

impl Query {
    /// Lower-case `text`, split on whitespace, and escape each term as a
    /// literal pattern. A `category` of `"all"` is the same as none.
    pub fn parse(text: &str, category: Option<&str>) -> Self {
        let terms = text
            .to_lowercase()
            .split_whitespace()
            .map(regex_lite::escape)
            .collect();

        let category = category
            .filter(|c| *c != ALL_CATEGORIES)
            .map(str::to_string);

        Self { terms, category }
    }

    /// Escaped, lower-cased terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The top-level grouping to restrict to, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Compiled term patterns. A term that fails to compile never matches.
struct Matcher {
    patterns: Vec<Option<Regex>>,
}

impl Matcher {
    fn new(terms: &[String]) -> Self {
        let patterns = terms
            .iter()
            .map(|term| {
                RegexBuilder::new(term)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| tracing::debug!(term = %term, error = %e, "Unusable search term"))
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// Relevance of `text`, or `None` when some term is absent.
    fn score(&self, text: &str) -> Option<usize> {
        let lowered = text.to_lowercase();
        let mut relevance = 0;
        for pattern in &self.patterns {
            let count = pattern.as_ref()?.find_iter(&lowered).count();
            if count == 0 {
                return None;
            }
            relevance += count;
        }
        Some(relevance)
    }
}

/// Run `query` against `tree`.
///
/// With a category, only the subtree under that top-level key is walked and
/// paths are relative to it; a missing category yields no results.
pub fn search(tree: &Value, query: &Query) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let root = match query.category() {
        Some(category) => match tree.get(category) {
            Some(subtree) => subtree,
            None => return Vec::new(),
        },
        None => tree,
    };

    let matcher = Matcher::new(query.terms());
    let mut results = Vec::new();
    let mut path = Vec::new();
    walk(root, &matcher, &mut path, &mut results);

    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    results.truncate(MAX_RESULTS);
    results
}

fn walk(node: &Value, matcher: &Matcher, path: &mut Vec<String>, results: &mut Vec<SearchResult>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                visit(key.clone(), value, matcher, path, results);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                visit(index.to_string(), value, matcher, path, results);
            }
        }
        _ => {}
    }
}

fn visit(
    key: String,
    value: &Value,
    matcher: &Matcher,
    path: &mut Vec<String>,
    results: &mut Vec<SearchResult>,
) {
    path.push(key);
    match value {
        Value::String(text) => {
            if let Some(relevance) = matcher.score(text) {
                results.push(SearchResult {
                    path: path.join("."),
                    content: text.clone(),
                    relevance,
                });
            }
        }
        Value::Object(_) | Value::Array(_) => walk(value, matcher, path, results),
        _ => {}
    }
    path.pop();
}
