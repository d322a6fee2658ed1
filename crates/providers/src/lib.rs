//! Completion API adapters.
//!
//! The gateway talks to the completion API through the
//! [`CompletionClient`] trait so the runtime can be tested against a
//! scripted stub. The only shipping adapter is
//! [`OpenAiCompatProvider`], which works with OpenAI and any endpoint
//! that follows the same chat completions contract (Ollama, vLLM,
//! Together, ...).

pub mod openai_compat;
pub mod traits;

pub use openai_compat::OpenAiCompatProvider;
pub use traits::{ChatRequest, ChatResponse, CompletionClient, Usage};
