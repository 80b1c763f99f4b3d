//! Configuration for the orchestrator.

use hermes_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which routing strategy the orchestrator uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Deterministic keyword/pattern rules
    #[default]
    Heuristic,

    /// One completion call returning a structured decision
    Model,
}

/// Main orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Base URLs of the remote agents to discover
    #[serde(default)]
    pub agents: Vec<String>,

    /// Routing strategy
    #[serde(default)]
    pub routing: RoutingMode,

    /// Whether aggregated responses are re-rendered through a streaming
    /// completion pass before being returned
    #[serde(default = "default_summarize")]
    pub summarize: bool,

    /// Timeout for individual transport requests, in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Completion-service configuration; required for model routing and
    /// for the summarization pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
}

fn default_summarize() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            agents: Vec::new(),
            routing: RoutingMode::default(),
            summarize: default_summarize(),
            request_timeout_ms: default_request_timeout(),
            llm: None,
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        if config.llm.as_ref().is_some_and(|llm| llm.api_key.is_some()) {
            warn!(
                "API key found in config file '{}'. For better security, \
                 use environment variables instead (OPENAI_API_KEY, ANTHROPIC_API_KEY).",
                path.display()
            );
        }

        Ok(config)
    }
}
