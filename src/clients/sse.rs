/// One dispatched server-sent event: the `event:` name and the joined
/// `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental parser for the SSE wire format. Feed it raw bytes as they
/// arrive; it hands back every frame completed by a blank line. Handles
/// chunk boundaries anywhere, `\r\n` line endings, comment lines and
/// multi-line `data:` fields. Fields other than `event:` and `data:`
/// (`id:`, `retry:`) are ignored.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(frame) = self.take_frame() {
                    frames.push(frame);
                }
            } else if line.starts_with(':') {
                // comment / keep-alive line
            } else if let Some(value) = field_value(line, "event") {
                self.event = Some(value.to_string());
            } else if let Some(value) = field_value(line, "data") {
                self.data_lines.push(value.to_string());
            }
        }
        frames
    }

    fn take_frame(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data_lines.is_empty() {
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(SseFrame { event, data })
    }
}

/// `"event: foo"` → `Some("foo")`; one leading space after the colon is
/// stripped, as the format prescribes.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?;
    let rest = rest.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_frame() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: order-created\ndata: {\"id\":1}\n\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: "order-created".into(),
                data: "{\"id\":1}".into(),
            }]
        );
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: heart").is_empty());
        assert!(parser.push(b"beat\ndata: {}").is_empty());
        let frames = parser.push(b"\n\n");
        assert_eq!(frames[0].event, "heartbeat");
        assert_eq!(frames[0].data, "{}");
    }

    #[test]
    fn crlf_line_endings() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: connected\r\ndata: {}\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "connected");
    }

    #[test]
    fn comment_lines_are_ignored() {
        let mut parser = SseParser::new();
        let frames = parser.push(b": ping\n\nevent: heartbeat\ndata: {}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "heartbeat");
    }

    #[test]
    fn multiple_data_lines_join_with_newline() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"data: one\ndata: two\n\n");
        assert_eq!(frames[0].data, "one\ntwo");
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn two_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let frames =
            parser.push(b"event: a\ndata: 1\n\nevent: b\ndata: 2\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "a");
        assert_eq!(frames[1].event, "b");
    }

    #[test]
    fn value_without_space_after_colon() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event:heartbeat\ndata:{}\n\n");
        assert_eq!(frames[0].event, "heartbeat");
        assert_eq!(frames[0].data, "{}");
    }

    #[test]
    fn blank_lines_between_frames_emit_nothing() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"\n\n\n").is_empty());
    }
}
