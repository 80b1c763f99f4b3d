//! The descriptor cache: discovered agents and their connections.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use hermes_common::{AgentManifest, OutboundMessage, Result, StreamEvent};
use tracing::debug;

use crate::transport::AgentTransport;

/// A live connection to one discovered remote agent.
///
/// Holds the agent's manifest and the transport used to reach it.
/// Created on first successful discovery; lives until the orchestrator
/// shuts down.
pub struct RemoteConnection {
    manifest: AgentManifest,
    transport: Arc<dyn AgentTransport>,
}

impl RemoteConnection {
    pub fn new(manifest: AgentManifest, transport: Arc<dyn AgentTransport>) -> Self {
        Self { manifest, transport }
    }

    pub fn manifest(&self) -> &AgentManifest {
        &self.manifest
    }

    /// Send a message to the agent and drain its event stream into one
    /// aggregated text result.
    ///
    /// Artifacts arrive in cumulative task snapshots; a request-local
    /// counter tracks how many have been collected so far, so an
    /// artifact index is never forwarded twice. A direct message event
    /// carries the final text itself and short-circuits the loop. The
    /// loop stops at the first terminal task state.
    pub async fn collect_response(&self, message: OutboundMessage) -> Result<String> {
        let mut events = self
            .transport
            .send_message(&self.manifest.url, message)
            .await?;

        let mut collected = String::new();
        let mut processed_artifacts = 0usize;
        let mut event_count = 0usize;

        while let Some(event) = events.next().await {
            event_count += 1;
            match event? {
                StreamEvent::Message { parts } => {
                    for part in &parts {
                        if let Some(text) = part.as_text() {
                            collected.push_str(text);
                        }
                    }
                    debug!(
                        agent = %self.manifest.name,
                        event_count,
                        "Received direct message reply"
                    );
                    break;
                }
                StreamEvent::Task(snapshot) => {
                    let total = snapshot.artifacts.len();
                    if total > processed_artifacts {
                        for artifact in &snapshot.artifacts[processed_artifacts..] {
                            collected.push_str(&artifact.text());
                        }
                        debug!(
                            agent = %self.manifest.name,
                            new_artifacts = total - processed_artifacts,
                            total_artifacts = total,
                            "Collected new artifacts"
                        );
                        processed_artifacts = total;
                    }
                    if snapshot.state.is_terminal() {
                        debug!(
                            agent = %self.manifest.name,
                            state = ?snapshot.state,
                            event_count,
                            "Task reached terminal state"
                        );
                        break;
                    }
                }
            }
        }

        Ok(collected)
    }
}

/// Registry of discovered agents, keyed by manifest name.
///
/// Owned by the orchestrator instance; populated once by discovery and
/// only read afterwards.
#[derive(Default)]
pub struct AgentRegistry {
    connections: HashMap<String, RemoteConnection>,
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.connections.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection: RemoteConnection) {
        self.connections
            .insert(connection.manifest().name.clone(), connection);
    }

    pub fn get(&self, name: &str) -> Option<&RemoteConnection> {
        self.connections.get(name)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Registered manifests, sorted by agent name for deterministic
    /// prompts and messages.
    pub fn roster(&self) -> Vec<AgentManifest> {
        let mut manifests: Vec<AgentManifest> = self
            .connections
            .values()
            .map(|c| c.manifest().clone())
            .collect();
        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        manifests
    }

    /// Per-agent JSON blocks (name, description, skill descriptions)
    /// used in the model router's prompt.
    pub fn roster_summary(&self) -> String {
        self.roster()
            .iter()
            .map(|manifest| {
                serde_json::json!({
                    "name": manifest.name,
                    "description": manifest.description,
                    "skills": manifest.skill_descriptions(),
                })
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
