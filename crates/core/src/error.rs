//! Error types for the aocook domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The error a chat turn can fail with.
///
/// Knowledge and tool failures never escape a turn: tools report them to the
/// assistant as payloads, so only remote assistant failures surface here.
#[derive(Debug, Error)]
pub enum Error {
    // --- Hosted assistant errors ---
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum AssistantError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by assistant service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Assistant service not configured: {0}")]
    NotConfigured(String),

    #[error("Run {run_id} did not finish within {timeout_secs}s")]
    Timeout { run_id: String, timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error("Documentation not available at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("Documentation at {path} is not valid JSON: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
