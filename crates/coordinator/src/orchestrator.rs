//! Top-level composition: discovery, routing, aggregation, summarization.

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use hermes_common::{HermesError, OutboundMessage, Part, ResponseChunk, Result};
use hermes_llm::{CompletionBackend, build_backend};
use tokio::sync::{OnceCell, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

use crate::config::{OrchestratorConfig, RoutingMode};
use crate::discovery;
use crate::registry::AgentRegistry;
use crate::routing::{HeuristicRouter, ModelRouter, RoutingStrategy};
use crate::summarize::Summarizer;
use crate::transport::{AgentTransport, HttpTransport};

/// The orchestrator's outward response stream.
pub type ChunkStream = Pin<Box<dyn Stream<Item = ResponseChunk> + Send>>;

/// The orchestration router.
///
/// Discovers agents lazily on the first request, routes each query to
/// at most one agent, aggregates the agent's event stream, and
/// optionally re-renders the result through a summarization pass. Every
/// response is a finite chunk stream ending in exactly one terminal
/// chunk; no internal failure escapes the stream.
///
/// Cloning is cheap and clones share the discovered registry.
#[derive(Clone)]
pub struct Orchestrator {
    config: OrchestratorConfig,
    transport: Arc<dyn AgentTransport>,
    strategy: Arc<dyn RoutingStrategy>,
    summarizer: Option<Arc<Summarizer>>,
    registry: Arc<OnceCell<AgentRegistry>>,
}

impl Orchestrator {
    /// Create an orchestrator with the HTTP transport and the completion
    /// backend described by the configuration.
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        let transport: Arc<dyn AgentTransport> =
            Arc::new(HttpTransport::new(config.request_timeout_ms));
        let backend = config.llm.as_ref().map(build_backend).transpose()?;
        Self::assemble(config, transport, backend)
    }

    /// Construction seam for embedders and tests that supply their own
    /// transport or completion backend.
    pub fn with_components(
        config: OrchestratorConfig,
        transport: Arc<dyn AgentTransport>,
        backend: Option<Arc<dyn CompletionBackend>>,
    ) -> Result<Self> {
        Self::assemble(config, transport, backend)
    }

    fn assemble(
        config: OrchestratorConfig,
        transport: Arc<dyn AgentTransport>,
        backend: Option<Arc<dyn CompletionBackend>>,
    ) -> Result<Self> {
        let strategy: Arc<dyn RoutingStrategy> = match config.routing {
            RoutingMode::Heuristic => Arc::new(HeuristicRouter::new()),
            RoutingMode::Model => {
                let backend = backend.clone().ok_or_else(|| {
                    HermesError::Config(
                        "model routing requires an [llm] configuration".to_string(),
                    )
                })?;
                Arc::new(ModelRouter::new(backend))
            }
        };

        let summarizer = if config.summarize {
            backend.map(|b| Arc::new(Summarizer::new(b)))
        } else {
            None
        };

        info!(
            routing = ?config.routing,
            summarize = summarizer.is_some(),
            agents = config.agents.len(),
            "Initialized orchestrator"
        );

        Ok(Self {
            config,
            transport,
            strategy,
            summarizer,
            registry: Arc::new(OnceCell::new()),
        })
    }

    /// Handle a request, forwarding the caller's original message parts
    /// when provided (preserving binary attachments) or sending a fresh
    /// text-only message otherwise.
    pub fn handle(&self, query: impl Into<String>, original_parts: Option<Vec<Part>>) -> ChunkStream {
        let query = query.into();
        let this = self.clone();
        let (tx, rx) = mpsc::channel::<ResponseChunk>(32);

        tokio::spawn(async move {
            this.run_pipeline(&query, original_parts, &tx).await;
            let _ = tx.send(ResponseChunk::terminal()).await;
        });

        Box::pin(ReceiverStream::new(rx))
    }

    /// Handle a plain text query.
    pub fn handle_query(&self, query: impl Into<String>) -> ChunkStream {
        self.handle(query, None)
    }

    /// Cancel an in-flight request.
    ///
    /// The orchestrator declines this capability: an explicit cancel is
    /// rejected rather than interrupting a running aggregation.
    pub fn cancel(&self) -> Result<()> {
        Err(HermesError::Unsupported(
            "cancellation of an in-flight request is not supported".to_string(),
        ))
    }

    async fn ensure_discovered(&self) -> Result<&AgentRegistry> {
        self.registry
            .get_or_try_init(|| discovery::discover_all(&self.transport, &self.config.agents))
            .await
    }

    /// Drive one request through the pipeline, emitting content chunks.
    /// The terminal chunk is sent by the caller.
    async fn run_pipeline(
        &self,
        query: &str,
        original_parts: Option<Vec<Part>>,
        tx: &mpsc::Sender<ResponseChunk>,
    ) {
        info!(
            query_preview = %query.chars().take(50).collect::<String>(),
            "Handling request"
        );

        let registry = match self.ensure_discovered().await {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "Discovery failed");
                let _ = tx
                    .send(ResponseChunk::content(format!("Agent discovery failed - {e}")))
                    .await;
                return;
            }
        };

        if registry.is_empty() {
            let _ = tx
                .send(ResponseChunk::content(
                    "No agents are available. Please ensure agents are running and configured.",
                ))
                .await;
            return;
        }

        let roster = registry.roster();
        let decision = match self.strategy.decide(query, &roster).await {
            Ok(decision) => decision,
            Err(e) => {
                error!(error = %e, "Routing failed");
                let _ = tx
                    .send(ResponseChunk::content(format!("Error routing query: {e}")))
                    .await;
                return;
            }
        };

        debug!(
            target = ?decision.target,
            rationale = %decision.rationale,
            "Routing decision made"
        );

        // unknown targets are treated identically to "none"
        let connection = decision
            .target
            .as_deref()
            .and_then(|name| registry.get(name));
        let Some(connection) = connection else {
            let _ = tx
                .send(ResponseChunk::content(self.strategy.no_route_reply(&roster)))
                .await;
            return;
        };

        let agent_name = connection.manifest().name.clone();
        info!(agent = %agent_name, "Dispatching to agent");

        let message = match original_parts {
            Some(parts) => OutboundMessage::from_parts(parts),
            None => OutboundMessage::text(query),
        };

        let aggregated = match connection.collect_response(message).await {
            Ok(text) => text,
            Err(e) => {
                warn!(agent = %agent_name, error = %e, "Dispatch failed");
                let _ = tx
                    .send(ResponseChunk::content(format!(
                        "Error communicating with {agent_name} - {e}"
                    )))
                    .await;
                return;
            }
        };

        debug!(
            agent = %agent_name,
            response_len = aggregated.len(),
            "Aggregation complete"
        );

        match &self.summarizer {
            Some(summarizer) => summarizer.run(query, &aggregated, &agent_name, tx).await,
            None => {
                let _ = tx.send(ResponseChunk::content(aggregated)).await;
            }
        }
    }
}
