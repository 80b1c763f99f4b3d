use std::sync::Arc;

use hermes_common::{HermesError, Result};
use serde::{Deserialize, Serialize};

use crate::anthropic::AnthropicBackend;
use crate::client::CompletionBackend;
use crate::openai::OpenAiBackend;
use crate::retry::{RetryConfig, RetryingBackend};

/// Completion-service configuration, deserialized from the `[llm]`
/// section of the coordinator's TOML config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type: "openai" or "anthropic"
    pub provider: String,

    /// Model name
    pub model: String,

    /// API key; falls back to the provider's environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl LlmConfig {
    /// Resolve the API key from config or environment.
    ///
    /// Priority: explicit `api_key`, then `OPENAI_API_KEY` /
    /// `ANTHROPIC_API_KEY` depending on the provider.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        let env_var = match self.provider.as_str() {
            "openai" => "OPENAI_API_KEY",
            "anthropic" => "ANTHROPIC_API_KEY",
            _ => return None,
        };

        std::env::var(env_var).ok()
    }
}

/// Build a completion backend from config, selecting the provider
/// variant at construction time.
pub fn build_backend(config: &LlmConfig) -> Result<Arc<dyn CompletionBackend>> {
    let base: Box<dyn CompletionBackend> = match config.provider.as_str() {
        "openai" => Box::new(OpenAiBackend::new(
            config.api_url.clone(),
            config.model.clone(),
            config.resolve_api_key(),
        )),
        "anthropic" => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                HermesError::Config("Anthropic requires an API key".to_string())
            })?;
            Box::new(AnthropicBackend::new(config.model.clone(), api_key))
        }
        other => {
            return Err(HermesError::Config(format!(
                "Unknown completion provider: {other}"
            )));
        }
    };

    Ok(Arc::new(RetryingBackend::new(base, config.retry.clone())))
}
