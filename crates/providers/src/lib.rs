//! Hosted assistant backends for aocook.
//!
//! All backends implement the `aocook_core::AssistantBackend` trait.

pub mod openai_assistants;

pub use openai_assistants::OpenAiAssistants;
