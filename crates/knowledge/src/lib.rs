//! Documentation knowledge base for aocook.
//!
//! The knowledge base is a single JSON document produced offline from the
//! documentation site. Top-level groupings (`concepts`, `examples`,
//! `sections`) hold arbitrarily nested objects whose string leaves are the
//! searchable text.
//!
//! - [`loader`] reads the file fresh for every query.
//! - [`search`] scans string leaves for all query terms and ranks matches.

pub mod loader;
pub mod search;

pub use loader::KnowledgeBase;
pub use search::{ALL_CATEGORIES, MAX_RESULTS, Query, SearchResult, search};
