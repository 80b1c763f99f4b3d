use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use hermes_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

/// Incremental content deltas from a streaming completion call.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A text-completion service, usable in two modes: a single-shot call
/// returning the full response, and a streaming call yielding content
/// deltas as they arrive.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
    async fn complete_stream(&self, request: CompletionRequest) -> Result<CompletionStream>;
    fn model_name(&self) -> &str;
}

#[async_trait]
impl CompletionBackend for Box<dyn CompletionBackend> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        (**self).complete(request).await
    }
    async fn complete_stream(&self, request: CompletionRequest) -> Result<CompletionStream> {
        (**self).complete_stream(request).await
    }
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_serialization_roundtrip() {
        let request = CompletionRequest {
            system_prompt: Some("You are a router.".to_string()),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "What is Python?".to_string(),
            }],
            temperature: Some(0.3),
            max_tokens: Some(1024),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: CompletionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.system_prompt.as_deref(), Some("You are a router."));
        assert_eq!(back.messages.len(), 1);
        assert_eq!(back.temperature, Some(0.3));
        assert_eq!(back.max_tokens, Some(1024));
    }

    #[test]
    fn completion_response_serialization_roundtrip() {
        let response = CompletionResponse {
            content: "{\"agent\": \"none\"}".to_string(),
            model: "gpt-4o".to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 20,
                completion_tokens: 8,
            }),
            finish_reason: Some("stop".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: CompletionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, response.content);
        assert_eq!(back.model, "gpt-4o");
        let usage = back.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 20);
        assert_eq!(usage.completion_tokens, 8);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
