//! Common types and errors shared across Hermes crates.
//!
//! This crate provides the wire-level data model that the coordinator
//! and its transport speak: agent manifests, message parts, task
//! snapshots, and the outward response-chunk contract.

pub mod chunk;
pub mod error;
pub mod manifest;
pub mod message;
pub mod sse;
pub mod task;

pub use chunk::ResponseChunk;
pub use error::{HermesError, Result};
pub use manifest::{AgentCapabilities, AgentManifest, AgentSkill};
pub use message::{MessageRole, OutboundMessage, Part};
pub use task::{Artifact, StreamEvent, TaskSnapshot, TaskState};
