//! Agent capability manifests.
//!
//! A manifest is the static metadata an agent publishes about itself:
//! its name, what it does, and the skills it declares. Manifests are
//! fetched once during discovery and are immutable after registration.

use serde::{Deserialize, Serialize};

/// Transport capabilities an agent advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Whether the agent streams its responses incrementally
    #[serde(default)]
    pub streaming: bool,
}

/// A single skill an agent declares in its manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    /// Stable skill identifier
    pub id: String,

    /// Human-readable skill name
    pub name: String,

    /// What the skill does
    pub description: String,

    /// Free-form tags for matching
    #[serde(default)]
    pub tags: Vec<String>,

    /// Example invocations
    #[serde(default)]
    pub examples: Vec<String>,
}

/// The capability manifest describing one remote agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentManifest {
    /// Unique agent name, used as the registry key
    pub name: String,

    /// Human-readable description of what the agent handles
    pub description: String,

    /// Base URL requests for this agent are sent to
    pub url: String,

    /// Advertised transport capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Declared skills
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentManifest {
    /// Descriptions of every declared skill, in manifest order.
    pub fn skill_descriptions(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.description.as_str()).collect()
    }
}
