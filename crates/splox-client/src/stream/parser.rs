use std::pin::Pin;

use bytes::Bytes;
use futures::StreamExt as _;

use crate::errors::SploxError;

use super::event::StreamEvent;

pub(crate) type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static>>;

const DATA_PREFIX: &str = "data:";

/// Longest line accepted from a listen stream, excluding its terminator.
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;

/// Splits an arbitrary chunking of bytes into `\n`-terminated lines.
///
/// Each byte is scanned once; consumed lines are compacted away on the next
/// push.
#[derive(Default)]
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
    start: usize,
    scanned: usize,
}

impl LineBuffer {
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Pops the next complete line without its terminator (`\n` or `\r\n`).
    ///
    /// Fails once a line grows past [`MAX_LINE_BYTES`], terminated or not.
    pub fn next_line(&mut self) -> Result<Option<String>, SploxError> {
        match self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset;
                if end - self.start > MAX_LINE_BYTES {
                    return Err(line_too_long());
                }
                let line = decode_line(&self.buf[self.start..end]);
                self.start = end + 1;
                self.scanned = self.start;
                Ok(Some(line))
            }
            None => {
                self.scanned = self.buf.len();
                if self.buf.len() - self.start > MAX_LINE_BYTES {
                    return Err(line_too_long());
                }
                Ok(None)
            }
        }
    }

    /// Returns a trailing unterminated line once the source is exhausted.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.start >= self.buf.len() {
            self.clear();
            return None;
        }
        let line = decode_line(&self.buf[self.start..]);
        self.clear();
        Some(line)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.start = 0;
        self.scanned = 0;
    }
}

fn line_too_long() -> SploxError {
    SploxError::Stream(format!("event line exceeds {MAX_LINE_BYTES} bytes"))
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Classifies one line. Only `data:` lines produce an event; blank lines,
/// `:` comments and `event:`/`id:`/`retry:` framing lines are skipped.
pub(crate) fn parse_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    Some(StreamEvent::from_payload(payload))
}

/// Lazy, forward-only event source over a byte stream.
///
/// Each call to [`EventParser::next_event`] reads only as far as needed to
/// produce one event.
pub(crate) struct EventParser {
    bytes: ByteStream,
    lines: LineBuffer,
    exhausted: bool,
}

impl EventParser {
    pub fn new(bytes: ByteStream) -> Self {
        Self {
            bytes,
            lines: LineBuffer::default(),
            exhausted: false,
        }
    }

    /// `Ok(None)` means the source closed cleanly.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>, SploxError> {
        loop {
            match self.lines.next_line() {
                Ok(Some(line)) => {
                    if let Some(event) = parse_line(&line) {
                        return Ok(Some(event));
                    }
                    continue;
                }
                Ok(None) => {}
                Err(err) => {
                    self.exhausted = true;
                    self.lines.clear();
                    return Err(err);
                }
            }
            if self.exhausted {
                return Ok(None);
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.lines.push_chunk(&chunk),
                Some(Err(e)) => {
                    self.exhausted = true;
                    self.lines.clear();
                    return Err(SploxError::Stream(format!("event stream read failed: {e}")));
                }
                None => {
                    self.exhausted = true;
                    if let Some(event) = self.lines.take_remainder().as_deref().and_then(parse_line) {
                        return Ok(Some(event));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn parser_from_chunks(chunks: Vec<&'static [u8]>) -> EventParser {
        let items: Vec<Result<Bytes, std::io::Error>> =
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))).collect();
        EventParser::new(Box::pin(stream::iter(items)))
    }

    #[test]
    fn line_buffer_handles_partial_chunks_and_crlf() {
        let mut lines = LineBuffer::default();
        lines.push_chunk(b"data: {\"type\":\"text_");
        assert_eq!(lines.next_line().expect("ok"), None);
        lines.push_chunk(b"delta\"}\r\n\r\ndata: keep");
        assert_eq!(
            lines.next_line().expect("ok").as_deref(),
            Some("data: {\"type\":\"text_delta\"}")
        );
        assert_eq!(lines.next_line().expect("ok").as_deref(), Some(""));
        assert_eq!(lines.next_line().expect("ok"), None);
        assert_eq!(lines.take_remainder().as_deref(), Some("data: keep"));
        assert_eq!(lines.take_remainder(), None);
    }

    #[test]
    fn non_data_lines_yield_nothing() {
        for line in ["", "   ", ": comment", ":", "event: update", "id: 7", "retry: 1000", "datum: x"] {
            assert!(parse_line(line).is_none(), "{line:?}");
        }
    }

    #[test]
    fn data_prefix_and_whitespace_are_stripped() {
        let event = parse_line("  data:   keepalive  ").expect("event");
        assert!(event.is_keepalive());
        let event = parse_line("data:{\"type\":\"done\"}").expect("event");
        assert_eq!(event.raw(), "{\"type\":\"done\"}");
        let empty = parse_line("data:").expect("event");
        assert!(empty.is_raw_only());
        assert_eq!(empty.raw(), "");
    }

    #[tokio::test]
    async fn events_are_yielded_in_order_across_chunks() {
        let mut parser = parser_from_chunks(vec![
            b": hello\n\nevent: update\nda",
            b"ta: keepalive\n\ndata: {broken\n",
            b"data: {\"type\":\"done\"}",
        ]);
        let first = parser.next_event().await.expect("ok").expect("first");
        assert!(first.is_keepalive());
        let second = parser.next_event().await.expect("ok").expect("second");
        assert!(second.is_raw_only());
        assert_eq!(second.raw(), "{broken");
        let third = parser.next_event().await.expect("ok").expect("third");
        assert_eq!(third.raw(), "{\"type\":\"done\"}");
        assert!(parser.next_event().await.expect("ok").is_none());
        assert!(parser.next_event().await.expect("ok").is_none());
    }

    #[tokio::test]
    async fn read_failure_becomes_stream_error_and_stops() {
        let items: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"data: keepalive\n")),
            Err(std::io::Error::other("connection reset")),
            Ok(Bytes::from_static(b"data: keepalive\n")),
        ];
        let mut parser = EventParser::new(Box::pin(stream::iter(items)));
        assert!(parser.next_event().await.expect("ok").is_some());
        let err = parser.next_event().await.expect_err("read failure");
        assert!(matches!(err, SploxError::Stream(msg) if msg.contains("connection reset")));
        assert!(parser.next_event().await.expect("ok").is_none());
    }

    #[test]
    fn line_buffer_compacts_consumed_lines_between_pushes() {
        let mut lines = LineBuffer::default();
        lines.push_chunk(b"a\nb\nc");
        assert_eq!(lines.next_line().expect("ok").as_deref(), Some("a"));
        lines.push_chunk(b"d\n");
        assert_eq!(lines.next_line().expect("ok").as_deref(), Some("b"));
        assert_eq!(lines.next_line().expect("ok").as_deref(), Some("cd"));
        assert_eq!(lines.next_line().expect("ok"), None);
        assert_eq!(lines.take_remainder(), None);
    }

    #[test]
    fn line_at_the_limit_is_accepted() {
        let mut lines = LineBuffer::default();
        lines.push_chunk(&vec![b'x'; MAX_LINE_BYTES]);
        assert_eq!(lines.next_line().expect("ok"), None);
        lines.push_chunk(b"\n");
        assert_eq!(lines.next_line().expect("ok").map(|l| l.len()), Some(MAX_LINE_BYTES));
    }

    #[tokio::test]
    async fn unterminated_oversized_line_stops_the_stream() {
        let mut items: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"data: keepalive\ndata: "))];
        items.extend((0..160).map(|_| Ok(Bytes::from(vec![b'a'; 16 * 1024]))));
        items.push(Ok(Bytes::from_static(b"\ndata: keepalive\n")));
        let mut parser = EventParser::new(Box::pin(stream::iter(items)));

        assert!(parser.next_event().await.expect("ok").is_some_and(|e| e.is_keepalive()));
        let err = parser.next_event().await.expect_err("line too long");
        assert!(matches!(err, SploxError::Stream(msg) if msg.contains("exceeds")));
        assert!(parser.next_event().await.expect("ok").is_none());
    }
}
