//! Text-completion backends for Hermes.
//!
//! One polymorphic capability — [`CompletionBackend`] — with a
//! single-shot mode (used for routing decisions) and a streaming mode
//! (used for summarization). Two variant implementations are selected
//! at construction time via [`build_backend`], so nothing downstream
//! branches on backend identity.

pub mod anthropic;
pub mod client;
pub mod config;
pub mod openai;
pub mod retry;

pub use anthropic::AnthropicBackend;
pub use client::{
    ChatMessage, CompletionBackend, CompletionRequest, CompletionResponse, CompletionStream, Role,
    TokenUsage,
};
pub use config::{LlmConfig, build_backend};
pub use openai::OpenAiBackend;
pub use retry::{RetryConfig, RetryingBackend};
