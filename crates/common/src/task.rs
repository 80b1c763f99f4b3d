//! Task snapshots and the streamed event model.

use serde::{Deserialize, Serialize};

use crate::message::Part;

/// Lifecycle state of a remote agent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Submitted,
    Working,
    Completed,
    Failed,
    Canceled,
    InputRequired,
    Unknown,
}

impl TaskState {
    /// Whether no further events will arrive for a task in this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Canceled | Self::InputRequired | Self::Unknown
        )
    }
}

/// A named, ordered set of output fragments from an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name assigned by the agent
    #[serde(default)]
    pub name: Option<String>,

    /// Ordered content parts
    pub parts: Vec<Part>,
}

impl Artifact {
    /// Concatenation of this artifact's text parts, in order.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

/// A snapshot of a task's state and accumulated artifacts.
///
/// Snapshots are cumulative: each one carries every artifact produced so
/// far, so consumers track how many they have already processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub state: TaskState,

    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// One event on an agent's response stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A direct message reply carrying final text and no artifacts
    Message { parts: Vec<Part> },

    /// A task snapshot
    Task(TaskSnapshot),
}
