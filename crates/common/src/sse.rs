//! Minimal server-sent-events framing shared by the streaming clients.

/// Drain every complete SSE frame from `buffer`, returning the payload
/// of each `data:` line in arrival order. Incomplete trailing frames are
/// left in the buffer for the next network chunk.
pub fn drain_data_lines(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(pos) = buffer.find("\n\n") {
        let frame: String = buffer.drain(..pos + 2).collect();
        for line in frame.lines() {
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
    }
    payloads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_complete_frames_only() {
        let mut buffer = "data: one\n\ndata: tw".to_string();
        assert_eq!(drain_data_lines(&mut buffer), vec!["one"]);
        assert_eq!(buffer, "data: tw");

        buffer.push_str("o\n\n");
        assert_eq!(drain_data_lines(&mut buffer), vec!["two"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn ignores_non_data_lines() {
        let mut buffer = "event: delta\ndata: payload\n\n".to_string();
        assert_eq!(drain_data_lines(&mut buffer), vec!["payload"]);
    }

    #[test]
    fn handles_multiple_frames_per_chunk() {
        let mut buffer = "data: a\n\ndata: b\n\ndata: c\n\n".to_string();
        assert_eq!(drain_data_lines(&mut buffer), vec!["a", "b", "c"]);
    }

    #[test]
    fn tolerates_missing_space_after_colon() {
        let mut buffer = "data:[DONE]\n\n".to_string();
        assert_eq!(drain_data_lines(&mut buffer), vec!["[DONE]"]);
    }
}
