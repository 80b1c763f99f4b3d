//! Optional summarization pass over aggregated agent output.

use std::sync::Arc;

use futures::StreamExt;
use hermes_common::{ResponseChunk, Result};
use hermes_llm::{ChatMessage, CompletionBackend, CompletionRequest, Role};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Higher sampling temperature for natural-sounding summaries.
const SUMMARY_TEMPERATURE: f32 = 0.7;

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are an assistant that presents information from specialized agents in a clear and concise way.

Your task:
1. Read the agent's response carefully
2. Present the key information in a well-formatted, easy-to-read manner
3. Maintain accuracy - don't add information not in the agent's response
4. If the agent returned multiple documents or results, organize them clearly

Keep your response focused and relevant to the user's query.";

/// Re-renders an aggregated agent response through a streaming
/// completion call, forwarding each delta as a response chunk.
///
/// If the streaming call fails at any point, the raw aggregated text is
/// emitted instead: a summarization failure never drops the underlying
/// answer. Terminal chunks are the orchestrator's responsibility.
pub struct Summarizer {
    backend: Arc<dyn CompletionBackend>,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub async fn run(
        &self,
        query: &str,
        aggregated: &str,
        agent_name: &str,
        tx: &mpsc::Sender<ResponseChunk>,
    ) {
        match self.stream_summary(query, aggregated, agent_name, tx).await {
            Ok(()) => {
                debug!(agent = %agent_name, "Summarization complete");
            }
            Err(e) => {
                warn!(
                    agent = %agent_name,
                    error = %e,
                    "Summarization failed, falling back to aggregated text"
                );
                let _ = tx.send(ResponseChunk::content(aggregated)).await;
            }
        }
    }

    async fn stream_summary(
        &self,
        query: &str,
        aggregated: &str,
        agent_name: &str,
        tx: &mpsc::Sender<ResponseChunk>,
    ) -> Result<()> {
        let user_prompt = format!(
            "User Query: {query}\n\n\
             Agent Response from {agent_name}:\n{aggregated}\n\n\
             Please provide a clear, well-formatted summary of this information \
             that directly answers the user's query."
        );

        let request = CompletionRequest {
            system_prompt: Some(SUMMARY_SYSTEM_PROMPT.to_string()),
            messages: vec![ChatMessage {
                role: Role::User,
                content: user_prompt,
            }],
            temperature: Some(SUMMARY_TEMPERATURE),
            max_tokens: None,
        };

        let mut deltas = self.backend.complete_stream(request).await?;
        while let Some(delta) = deltas.next().await {
            let delta = delta?;
            if !delta.is_empty() && tx.send(ResponseChunk::content(delta)).await.is_err() {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hermes_common::HermesError;
    use hermes_llm::{CompletionResponse, CompletionStream};

    /// Backend that streams scripted deltas, optionally ending in an
    /// error, or fails before the first delta.
    struct ScriptedBackend {
        deltas: Vec<Result<String>>,
        fail_on_open: bool,
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Err(HermesError::Completion("not used".into()))
        }

        async fn complete_stream(&self, _request: CompletionRequest) -> Result<CompletionStream> {
            if self.fail_on_open {
                return Err(HermesError::Completion("503 Service Unavailable".into()));
            }
            let deltas: Vec<Result<String>> = self
                .deltas
                .iter()
                .map(|d| match d {
                    Ok(s) => Ok(s.clone()),
                    Err(e) => Err(HermesError::Completion(e.to_string())),
                })
                .collect();
            Ok(Box::pin(futures::stream::iter(deltas)))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    async fn collect(summarizer: &Summarizer, aggregated: &str) -> Vec<ResponseChunk> {
        let (tx, mut rx) = mpsc::channel(32);
        summarizer.run("query", aggregated, "Doc Agent", &tx).await;
        drop(tx);

        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn forwards_each_delta_as_a_chunk() {
        let summarizer = Summarizer::new(Arc::new(ScriptedBackend {
            deltas: vec![Ok("Python ".into()), Ok("is a language.".into())],
            fail_on_open: false,
        }));

        let chunks = collect(&summarizer, "raw text").await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Python ");
        assert_eq!(chunks[1].content, "is a language.");
        assert!(chunks.iter().all(|c| !c.done));
    }

    #[tokio::test]
    async fn failure_before_first_delta_falls_back_to_raw_text() {
        let summarizer = Summarizer::new(Arc::new(ScriptedBackend {
            deltas: vec![],
            fail_on_open: true,
        }));

        let chunks = collect(&summarizer, "the raw aggregated answer").await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "the raw aggregated answer");
        assert!(!chunks[0].done);
    }

    #[tokio::test]
    async fn mid_stream_failure_still_yields_unmodified_raw_text() {
        let summarizer = Summarizer::new(Arc::new(ScriptedBackend {
            deltas: vec![
                Ok("partial ".into()),
                Err(HermesError::Completion("stream reset".into())),
            ],
            fail_on_open: false,
        }));

        let chunks = collect(&summarizer, "the raw aggregated answer").await;
        // the partial delta was already forwarded; the fallback appends
        // the complete raw text
        assert_eq!(chunks.last().unwrap().content, "the raw aggregated answer");
        assert!(chunks.iter().all(|c| !c.done));
    }
}
