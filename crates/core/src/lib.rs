//! # aocook Core
//!
//! Domain types, traits, and error definitions for the aocook documentation
//! assistant. This crate has **no framework dependencies**: it defines the
//! model that the knowledge, tools, providers, and agent crates implement
//! against.
//!
//! ## Seams
//!
//! - [`Tool`] / [`ToolRegistry`]: named operations with JSON Schema
//!   parameters that the hosted assistant may invoke.
//! - [`AssistantBackend`]: the hosted assistant/thread/run lifecycle API.
//! - [`ChatSession`]: per-conversation state passed explicitly through a turn.

pub mod assistant;
pub mod error;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use assistant::{AssistantBackend, AssistantSpec, ReplyContent, Run, RunStatus, ToolOutput};
pub use error::{AssistantError, Error, KnowledgeError, Result, ToolError};
pub use session::{ChatSession, ConversationId};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
