//! The chat relay — the heart of aocook.
//!
//! One turn follows a fixed sequence against the hosted assistant service:
//!
//! 1. **Ensure** the assistant exists (created once per relay)
//! 2. **Ensure** the conversation has a thread (created on its first turn)
//! 3. **Append** the user message and **start** a run
//! 4. **Poll** the run; when it asks for tools, dispatch them and submit outputs
//! 5. **Extract** the text of the newest reply, or fall back to a fixed apology
//!
//! Conversation state lives in a [`ChatSession`](aocook_core::ChatSession)
//! that the caller owns; the gateway keeps them in a [`SessionStore`].

pub mod prompt;
pub mod relay;
pub mod session;

pub use prompt::DEFAULT_INSTRUCTIONS;
pub use relay::{ChatRelay, FALLBACK_REPLY, TurnOutcome};
pub use session::{MAX_SESSIONS, SessionStore};
