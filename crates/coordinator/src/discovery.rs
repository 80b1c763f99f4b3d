//! Concurrent agent discovery.

use std::sync::Arc;

use futures::future::join_all;
use hermes_common::{HermesError, Result};
use tracing::{info, warn};

use crate::registry::{AgentRegistry, RemoteConnection};
use crate::transport::AgentTransport;

/// Fetch every configured agent's manifest concurrently and build the
/// registry.
///
/// All fetches run to completion before the results are joined; a
/// failing endpoint does not cancel its siblings but does fail the
/// whole discovery with one aggregated error naming every endpoint
/// that failed.
pub async fn discover_all(
    transport: &Arc<dyn AgentTransport>,
    endpoints: &[String],
) -> Result<AgentRegistry> {
    info!(count = endpoints.len(), "Discovering remote agents");

    let fetches = endpoints.iter().map(|endpoint| {
        let transport = Arc::clone(transport);
        let endpoint = endpoint.clone();
        async move {
            let result = transport.fetch_manifest(&endpoint).await;
            (endpoint, result)
        }
    });

    let mut registry = AgentRegistry::new();
    let mut failures = Vec::new();

    for (endpoint, result) in join_all(fetches).await {
        match result {
            Ok(manifest) => {
                info!(agent = %manifest.name, endpoint = %endpoint, "Registered agent");
                registry.insert(RemoteConnection::new(manifest, Arc::clone(transport)));
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Agent discovery failed");
                failures.push(format!("{endpoint}: {e}"));
            }
        }
    }

    if !failures.is_empty() {
        return Err(HermesError::Discovery(format!(
            "{} of {} agent endpoints failed: {}",
            failures.len(),
            endpoints.len(),
            failures.join("; ")
        )));
    }

    info!(count = registry.len(), "Agent discovery complete");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hermes_common::{AgentManifest, OutboundMessage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::transport::EventStream;

    /// Transport whose manifests succeed or fail per endpoint suffix.
    struct FlakyTransport {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl AgentTransport for FlakyTransport {
        async fn fetch_manifest(&self, base_url: &str) -> Result<AgentManifest> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if base_url.ends_with("bad") {
                return Err(HermesError::Transport("connection refused".into()));
            }
            Ok(AgentManifest {
                name: format!("agent-{base_url}"),
                description: "test agent".into(),
                url: base_url.to_string(),
                capabilities: Default::default(),
                skills: vec![],
            })
        }

        async fn send_message(
            &self,
            _url: &str,
            _message: OutboundMessage,
        ) -> Result<EventStream> {
            Ok(Box::pin(futures::stream::empty()))
        }
    }

    #[tokio::test]
    async fn all_endpoints_succeed() {
        let transport: Arc<dyn AgentTransport> = Arc::new(FlakyTransport {
            fetches: AtomicUsize::new(0),
        });
        let endpoints = vec!["http://a".to_string(), "http://b".to_string()];

        let registry = discover_all(&transport, &endpoints).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn one_failure_fails_discovery_without_cancelling_siblings() {
        let flaky = Arc::new(FlakyTransport {
            fetches: AtomicUsize::new(0),
        });
        let transport: Arc<dyn AgentTransport> = flaky.clone();
        let endpoints = vec!["http://a".to_string(), "http://bad".to_string()];

        let err = discover_all(&transport, &endpoints).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("1 of 2"));
        assert!(msg.contains("http://bad"));
        // the healthy endpoint was still fetched
        assert_eq!(flaky.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_endpoint_list_yields_empty_registry() {
        let transport: Arc<dyn AgentTransport> = Arc::new(FlakyTransport {
            fetches: AtomicUsize::new(0),
        });

        let registry = discover_all(&transport, &[]).await.unwrap();
        assert!(registry.is_empty());
    }
}
