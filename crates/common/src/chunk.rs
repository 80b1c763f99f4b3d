//! The outward response-chunk contract.

use serde::{Deserialize, Serialize};

/// One chunk of the coordinator's outward response stream.
///
/// A response is a finite sequence of chunks; exactly one chunk with
/// `done = true` terminates it and nothing is emitted after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Incremental content, possibly empty
    pub content: String,

    /// Whether this chunk terminates the stream
    pub done: bool,
}

impl ResponseChunk {
    /// A non-terminal content chunk.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    /// The terminal chunk: empty content, `done = true`.
    pub fn terminal() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_chunk_is_not_done() {
        let chunk = ResponseChunk::content("hello");
        assert_eq!(chunk.content, "hello");
        assert!(!chunk.done);
    }

    #[test]
    fn terminal_chunk_is_empty_and_done() {
        let chunk = ResponseChunk::terminal();
        assert!(chunk.content.is_empty());
        assert!(chunk.done);
    }

    #[test]
    fn chunk_serialization_roundtrip() {
        let chunk = ResponseChunk::content("partial text");
        let json = serde_json::to_string(&chunk).unwrap();
        let back: ResponseChunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
    }
}
