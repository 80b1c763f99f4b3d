//! Agent discovery, routing, and streaming-response aggregation.
//!
//! The orchestrator is the front-line coordinator that:
//! 1. Discovers remote agents by fetching their capability manifests
//! 2. Decides which agent should handle a given request
//! 3. Forwards the request and aggregates the agent's event stream
//! 4. Optionally re-renders the result through a streaming completion pass
//!
//! # Architecture
//!
//! ```text
//! User Query
//!      │
//!      ▼
//! ┌──────────────────┐   manifest fetch (once, concurrent)
//! │   Orchestrator   │ ─────────────────────────────────┐
//! │   (this crate)   │                                  │
//! └────────┬─────────┘                                  ▼
//!          │ routed request                      ┌─────────────┐
//!    ┌─────┴──────┬─────────────┐                │  Registry   │
//!    ▼            ▼             ▼                │ (manifests) │
//! [Document]  [Image]      [Other remote         └─────────────┘
//!  agent       agent        agents...]
//!    │            │             │
//!    └────────────┴─────────────┘
//!          event streams, aggregated and optionally summarized
//!          into one outward chunk stream ending in `done = true`
//! ```

pub mod config;
pub mod discovery;
pub mod orchestrator;
pub mod registry;
pub mod routing;
pub mod summarize;
pub mod transport;

pub use config::{OrchestratorConfig, RoutingMode};
pub use discovery::discover_all;
pub use orchestrator::{ChunkStream, Orchestrator};
pub use registry::{AgentRegistry, RemoteConnection};
pub use routing::{HeuristicRouter, ModelRouter, RoutingDecision, RoutingStrategy};
pub use summarize::Summarizer;
pub use transport::{AgentTransport, EventStream, HttpTransport};
