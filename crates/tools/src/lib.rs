//! Documentation tools for the aocook assistant.
//!
//! Three tools wrap the knowledge base search:
//! - `searchDocs`: ranked search, optionally within one grouping
//! - `getExample`: best-matching example, with suggestions on a miss
//! - `explainConcept`: concept text at a chosen level of detail
//!
//! Each call re-reads the knowledge base file, so the tools are pure
//! functions of (file contents, arguments). A missing or unreadable file
//! produces an `error` payload instead of a failed call.

pub mod explain_concept;
pub mod get_example;
pub mod params;
pub mod search_docs;

use std::path::PathBuf;

use aocook_core::tool::ToolRegistry;

pub use explain_concept::ExplainConceptTool;
pub use get_example::GetExampleTool;
pub use search_docs::SearchDocsTool;

/// Create a registry with all documentation tools reading `docs_path`.
pub fn default_registry(docs_path: impl Into<PathBuf>) -> ToolRegistry {
    let docs_path = docs_path.into();
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchDocsTool::new(docs_path.clone())));
    registry.register(Box::new(GetExampleTool::new(docs_path.clone())));
    registry.register(Box::new(ExplainConceptTool::new(docs_path)));
    registry
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_exposes_three_tools() {
        let registry = default_registry("aodocs.json");
        assert_eq!(registry.names(), vec!["explainConcept", "getExample", "searchDocs"]);
    }

    #[test]
    fn every_schema_requires_its_primary_argument() {
        let registry = default_registry("aodocs.json");
        for (name, required) in [
            ("searchDocs", "query"),
            ("getExample", "topic"),
            ("explainConcept", "concept"),
        ] {
            let schema = registry.get(name).unwrap().parameters_schema();
            assert_eq!(schema["type"], "object");
            assert_eq!(schema["required"], serde_json::json!([required]));
        }
    }
}
