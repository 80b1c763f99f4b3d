//! Message envelopes sent to remote agents.

use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// One part of a message or artifact.
///
/// Text parts carry plain text. File parts carry a base64 payload with
/// its mime type; the coordinator forwards them opaquely and never
/// decodes the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    File { mime_type: String, data: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text content of this part, if it is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::File { .. } => None,
        }
    }
}

/// The request envelope sent to a remote agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Role of the sender
    pub role: MessageRole,

    /// Ordered message parts
    pub parts: Vec<Part>,

    /// Unique message ID
    pub message_id: String,
}

impl OutboundMessage {
    /// A freshly constructed text-only message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![Part::text(content)],
            message_id: new_message_id(),
        }
    }

    /// A message forwarding caller-supplied parts unchanged, preserving
    /// binary attachments.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            role: MessageRole::User,
            parts,
            message_id: new_message_id(),
        }
    }
}

fn new_message_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
