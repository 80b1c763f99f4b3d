//! Transport client for the agent wire protocol.
//!
//! Agents publish a capability manifest at their base URL and accept
//! message envelopes whose responses arrive as a server-sent-event
//! stream of [`StreamEvent`]s. The [`AgentTransport`] trait is the seam
//! the orchestrator drives; [`HttpTransport`] is the reqwest-backed
//! implementation.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use hermes_common::sse;
use hermes_common::{AgentManifest, HermesError, OutboundMessage, Result, StreamEvent};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Events received from one agent request.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Client side of the agent protocol.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Fetch the capability manifest published at an agent's base URL.
    async fn fetch_manifest(&self, base_url: &str) -> Result<AgentManifest>;

    /// Send a message envelope to an agent and open its event stream.
    async fn send_message(&self, url: &str, message: OutboundMessage) -> Result<EventStream>;
}

/// HTTP/SSE implementation of the agent protocol.
pub struct HttpTransport {
    http_client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(request_timeout_ms: u64) -> Self {
        let request_timeout = Duration::from_millis(request_timeout_ms);
        Self {
            http_client: reqwest::Client::builder()
                .connect_timeout(request_timeout)
                .build()
                .unwrap_or_default(),
            request_timeout,
        }
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn fetch_manifest(&self, base_url: &str) -> Result<AgentManifest> {
        debug!(url = %base_url, "Fetching agent manifest");

        let response = self
            .http_client
            .get(base_url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| HermesError::Transport(format!("manifest fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HermesError::Transport(format!(
                "manifest fetch returned {status}"
            )));
        }

        let manifest: AgentManifest = response
            .json()
            .await
            .map_err(|e| HermesError::Transport(format!("malformed manifest: {e}")))?;

        debug!(agent = %manifest.name, "Fetched agent manifest");
        Ok(manifest)
    }

    async fn send_message(&self, url: &str, message: OutboundMessage) -> Result<EventStream> {
        debug!(url = %url, message_id = %message.message_id, "Sending message to agent");

        let response = self
            .http_client
            .post(url)
            .json(&message)
            .send()
            .await
            .map_err(|e| HermesError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HermesError::Transport(format!(
                "agent returned {status}"
            )));
        }

        let (tx, rx) = mpsc::channel::<Result<StreamEvent>>(32);
        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx
                            .send(Err(HermesError::Transport(format!(
                                "event stream failed: {e}"
                            ))))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));
                for data in sse::drain_data_lines(&mut buffer) {
                    let item = serde_json::from_str::<StreamEvent>(&data).map_err(|e| {
                        HermesError::Transport(format!("undecodable event: {e}"))
                    });
                    if tx.send(item).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_builds_with_timeout() {
        let transport = HttpTransport::new(5000);
        assert_eq!(transport.request_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn stream_event_decodes_from_sse_payload() {
        let mut buffer =
            "data: {\"kind\":\"task\",\"state\":\"working\",\"artifacts\":[]}\n\n".to_string();
        let payloads = sse::drain_data_lines(&mut buffer);
        assert_eq!(payloads.len(), 1);
        let event: StreamEvent = serde_json::from_str(&payloads[0]).unwrap();
        assert!(matches!(event, StreamEvent::Task(_)));
    }
}
