//! Incremental parser for `text/event-stream` bodies.
//!
//! The streaming endpoint (`streamGenerateContent?alt=sse`) delivers one
//! JSON envelope per SSE frame. Frames are separated by a blank line and
//! payload lines carry a `data: ` prefix. Bytes arrive in arbitrary
//! chunks, so the parser buffers until full lines are available.

/// Stateful splitter turning raw bytes into complete `data:` payloads.
#[derive(Default)]
pub struct SseParser {
    buffer: String,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns the payloads of every frame completed by
    /// this chunk, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
            if line.is_empty() {
                // Blank line terminates the frame
                if !self.data.is_empty() {
                    payloads.push(std::mem::take(&mut self.data));
                }
            } else if let Some(rest) = line.strip_prefix("data:") {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
            }
            // Comments and other fields are ignored
        }
        payloads
    }

    /// Flush a final unterminated frame once the body is exhausted.
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.buffer);
        let tail = tail.trim_end_matches(|c| c == '\n' || c == '\r');
        if let Some(rest) = tail.strip_prefix("data:") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
        if self.data.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut parser = SseParser::new();
        let payloads = parser.push(b"data: {\"a\":1}\n\n");
        assert_eq!(payloads, vec!["{\"a\":1}"]);
        assert!(parser.finish().is_none());
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: {\"a\"").is_empty());
        assert!(parser.push(b":1}").is_empty());
        let payloads = parser.push(b"\n\ndata: {\"b\":2}\n\n");
        assert_eq!(payloads, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn test_crlf_frames() {
        let mut parser = SseParser::new();
        let payloads = parser.push(b"data: one\r\n\r\ndata: two\r\n\r\n");
        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn test_non_data_lines_ignored() {
        let mut parser = SseParser::new();
        let payloads = parser.push(b": keepalive\nevent: message\ndata: payload\n\n");
        assert_eq!(payloads, vec!["payload"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_frame() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: tail").is_empty());
        assert_eq!(parser.finish().as_deref(), Some("tail"));
    }
}
