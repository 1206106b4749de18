//! # Incremental HTTP Request Parser
//!
//! Turns a stream of byte chunks per connection into a complete parsed
//! request, a framing error, or a "need more data" signal, without losing
//! data across chunk boundaries.
//!
//! ## Overview
//!
//! The parser keeps one parse state per connection with a request in
//! flight. The first chunk for a connection goes through `begin_parsing`
//! (request line, headers, body strategy); later chunks go through
//! `continue_parsing` (body accumulation only). A request whose header block
//! spans more than one chunk is not reassembled; only bodies continue across
//! chunks.
//!
//! ## Concurrency
//!
//! All entry points serialize on a single mutex over the pending-state map,
//! so the state for a given connection evolves sequentially even when chunks
//! for different connections arrive on different threads.
//!
//! ## Errors
//!
//! Framing failures are reported as [`FramingError`] values rather than being
//! smuggled through the method field; `Display` still yields the historical
//! sentinel strings (`BAD_METHOD_OR_URI_OR_VERSION`, ...) so logs stay
//! grep-able.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::ServerConfig;

/// How the body of an in-flight request is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Body length declared up front by `Content-Length`.
    ContentLength(usize),
    /// Reserved for chunked transfer encoding; not implemented.
    Chunked,
    /// No body.
    None,
}

/// A protocol-level failure that prevents delivering a usable request.
///
/// The web layer translates these into `400 Bad Request` (or `501` for the
/// unsupported-encoding variants) and closes the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Request line did not split into exactly three non-empty tokens.
    BadMethodOrUriOrVersion,
    /// Cumulative header name+value bytes exceeded the configured limit.
    BadHeadersTooLarge,
    /// `Content-Length` repeated, or combined with `Transfer-Encoding`.
    BadRepeatedLengthOrTransferEncodingOrBoth,
    /// `Transfer-Encoding` carried a chunked token (reserved, unimplemented).
    UnsupportedTransferEncodingChunked,
    /// Body exceeded the declared length or the configured maximum.
    BadContentTooLarge,
    /// Continuation attempted under a strategy the parser cannot drive.
    UnsupportedParseStrategy,
    /// Malformed framing metadata, e.g. an unparsable `Content-Length` value.
    BadRequest,
}

impl FramingError {
    /// Wire sentinel carried by this error.
    pub fn sentinel(&self) -> &'static str {
        match self {
            FramingError::BadMethodOrUriOrVersion => "BAD_METHOD_OR_URI_OR_VERSION",
            FramingError::BadHeadersTooLarge => "BAD_HEADERS_TOO_LARGE",
            FramingError::BadRepeatedLengthOrTransferEncodingOrBoth => {
                "BAD_REPEATED_LENGTH_OR_TRANSFER_ENCODING_OR_BOTH"
            }
            FramingError::UnsupportedTransferEncodingChunked => {
                "UNSUPPORTED_TRANSFER_ENCODING_CHUNKED"
            }
            FramingError::BadContentTooLarge => "BAD_CONTENT_TOO_LARGE",
            FramingError::UnsupportedParseStrategy => "UNSUPPORTED_PARSE_STRATEGY",
            FramingError::BadRequest => "BAD_REQUEST",
        }
    }

    /// HTTP status the web layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            FramingError::UnsupportedTransferEncodingChunked
            | FramingError::UnsupportedParseStrategy => 501,
            _ => 400,
        }
    }
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentinel())
    }
}

impl std::error::Error for FramingError {}

/// A parsed request, or the preview of one still accumulating its body.
///
/// Header names are stored uppercase (header comparison is ASCII
/// case-insensitive); values are byte-exact except that surrounding ASCII
/// spaces and tabs are trimmed. Duplicate names are preserved as separate
/// entries in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub uri: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ParsedRequest {
    /// All values for a header, looked up case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        let wanted = name.to_ascii_uppercase();
        self.headers
            .iter()
            .filter(|(n, _)| *n == wanted)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Result of feeding one chunk to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A full request was assembled; the connection's state is gone.
    Complete(ParsedRequest),
    /// More data is needed. The payload is a preview: after the first chunk
    /// it carries everything seen so far, on later chunks only the request
    /// line fields.
    Partial(ParsedRequest),
}

/// Per-connection accumulator held between chunks.
#[derive(Debug)]
struct ParseState {
    strategy: ParseStrategy,
    method: String,
    uri: String,
    version: String,
    headers: Vec<(String, String)>,
    expected_body_length: usize,
    accumulated_body: Vec<u8>,
    last_activity: Instant,
}

enum Begun {
    Done(ParseOutcome),
    Failed(FramingError),
    InFlight(ParseState, ParsedRequest),
}

/// Thread-safe incremental parser for HTTP/1.1 request framing.
pub struct HttpParser {
    max_header_size: usize,
    max_body_size: usize,
    pending: Mutex<HashMap<u64, ParseState>>,
}

impl HttpParser {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            max_header_size: config.max_header_size,
            max_body_size: config.max_body_size,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Feed one chunk of bytes received on `conn_id`.
    ///
    /// A connection with no in-flight state starts a new request; a known
    /// connection continues accumulating its body. Both paths run under the
    /// parser mutex.
    pub fn parse(&self, conn_id: u64, bytes: &[u8]) -> Result<ParseOutcome, FramingError> {
        let mut pending = self.pending.lock().unwrap();
        if let Some(state) = pending.get_mut(&conn_id) {
            let result = Self::continue_parsing(state, bytes, self.max_body_size);
            match result {
                Ok(ParseOutcome::Partial(_)) => {}
                // Complete or failed: the request is no longer in flight.
                _ => {
                    pending.remove(&conn_id);
                }
            }
            return result;
        }

        match self.begin_parsing(bytes) {
            Begun::Done(outcome) => Ok(outcome),
            Begun::Failed(err) => Err(err),
            Begun::InFlight(state, preview) => {
                pending.insert(conn_id, state);
                Ok(ParseOutcome::Partial(preview))
            }
        }
    }

    /// Drop the state for a connection that went away mid-request.
    pub fn forget(&self, conn_id: u64) {
        self.pending.lock().unwrap().remove(&conn_id);
    }

    /// Number of requests currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Evict states idle for longer than `max_idle`, reporting each victim's
    /// connection id through `close` so the caller can close it via the
    /// connection registry.
    pub fn cleanup_idle(&self, max_idle: Duration, mut close: impl FnMut(u64)) {
        let now = Instant::now();
        let mut pending = self.pending.lock().unwrap();
        pending.retain(|conn_id, state| {
            if now.duration_since(state.last_activity) > max_idle {
                debug!(conn_id, "evicting idle parse state");
                close(*conn_id);
                false
            } else {
                true
            }
        });
    }

    fn begin_parsing(&self, bytes: &[u8]) -> Begun {
        let mut lines = Lines::new(bytes);

        let (method, uri, version) = match lines.next().and_then(parse_request_line) {
            Some(parts) => parts,
            None => return Begun::Failed(FramingError::BadMethodOrUriOrVersion),
        };

        let headers = match self.parse_headers(&mut lines) {
            Ok(headers) => headers,
            Err(err) => return Begun::Failed(err),
        };
        let body = lines.rest();

        let content_lengths = count_header(&headers, "CONTENT-LENGTH");
        let has_transfer_encoding = count_header(&headers, "TRANSFER-ENCODING") > 0;
        if content_lengths > 1 || (content_lengths == 1 && has_transfer_encoding) {
            return Begun::Failed(FramingError::BadRepeatedLengthOrTransferEncodingOrBoth);
        }
        if has_chunked_encoding(&headers) {
            return Begun::Failed(FramingError::UnsupportedTransferEncodingChunked);
        }

        if content_lengths == 1 {
            let declared = headers
                .iter()
                .find(|(n, _)| n == "CONTENT-LENGTH")
                .map(|(_, v)| v.as_str())
                .unwrap_or_default();
            let expected: usize = match declared.trim().parse() {
                Ok(n) => n,
                Err(_) => {
                    warn!(value = declared, "unparsable Content-Length");
                    return Begun::Failed(FramingError::BadRequest);
                }
            };
            return self.start_content_length_body(method, uri, version, headers, expected, body);
        }

        // No framing headers: the request is complete with an empty body.
        Begun::Done(ParseOutcome::Complete(ParsedRequest {
            method,
            uri,
            version,
            headers,
            body: Vec::new(),
        }))
    }

    fn start_content_length_body(
        &self,
        method: String,
        uri: String,
        version: String,
        headers: Vec<(String, String)>,
        expected: usize,
        body: &[u8],
    ) -> Begun {
        if body.len() > expected || body.len() > self.max_body_size {
            return Begun::Failed(FramingError::BadContentTooLarge);
        }
        if body.len() == expected {
            return Begun::Done(ParseOutcome::Complete(ParsedRequest {
                method,
                uri,
                version,
                headers,
                body: body.to_vec(),
            }));
        }

        let preview = ParsedRequest {
            method: method.clone(),
            uri: uri.clone(),
            version: version.clone(),
            headers: headers.clone(),
            body: body.to_vec(),
        };
        let state = ParseState {
            strategy: ParseStrategy::ContentLength(expected),
            method,
            uri,
            version,
            headers,
            expected_body_length: expected,
            accumulated_body: body.to_vec(),
            last_activity: Instant::now(),
        };
        Begun::InFlight(state, preview)
    }

    fn continue_parsing(
        state: &mut ParseState,
        bytes: &[u8],
        max_body_size: usize,
    ) -> Result<ParseOutcome, FramingError> {
        state.last_activity = Instant::now();

        match state.strategy {
            ParseStrategy::ContentLength(_) => {}
            // Chunked is a reserved extension point; nothing else continues.
            ParseStrategy::Chunked | ParseStrategy::None => {
                return Err(FramingError::UnsupportedParseStrategy)
            }
        }

        state.accumulated_body.extend_from_slice(bytes);
        let size = state.accumulated_body.len();
        if size > state.expected_body_length || size > max_body_size {
            return Err(FramingError::BadContentTooLarge);
        }
        if size == state.expected_body_length {
            return Ok(ParseOutcome::Complete(ParsedRequest {
                method: std::mem::take(&mut state.method),
                uri: std::mem::take(&mut state.uri),
                version: std::mem::take(&mut state.version),
                headers: std::mem::take(&mut state.headers),
                body: std::mem::take(&mut state.accumulated_body),
            }));
        }

        // Still short: report only the request line fields.
        Ok(ParseOutcome::Partial(ParsedRequest {
            method: state.method.clone(),
            uri: state.uri.clone(),
            version: state.version.clone(),
            headers: Vec::new(),
            body: Vec::new(),
        }))
    }

    fn parse_headers(&self, lines: &mut Lines<'_>) -> Result<Vec<(String, String)>, FramingError> {
        let mut headers = Vec::new();
        let mut headers_size = 0usize;

        for line in lines {
            if line.is_empty() {
                break;
            }
            let text = String::from_utf8_lossy(line);
            let Some(colon) = text.find(':') else {
                // Lines without a colon are silently skipped.
                continue;
            };
            let name = text[..colon].to_ascii_uppercase();
            let value = text[colon + 1..]
                .trim_matches(|c| c == ' ' || c == '\t')
                .to_string();

            headers_size += name.len() + value.len();
            if headers_size > self.max_header_size {
                return Err(FramingError::BadHeadersTooLarge);
            }
            headers.push((name, value));
        }

        Ok(headers)
    }
}

fn parse_request_line(line: &[u8]) -> Option<(String, String, String)> {
    let text = String::from_utf8_lossy(line);
    let mut tokens = text.split_ascii_whitespace();
    let method = tokens.next()?.to_string();
    let uri = tokens.next()?.to_string();
    let version = tokens.next()?.to_string();
    if tokens.next().is_some() {
        return None;
    }
    Some((method, uri, version))
}

fn count_header(headers: &[(String, String)], name: &str) -> usize {
    headers.iter().filter(|(n, _)| n == name).count()
}

fn has_chunked_encoding(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .filter(|(n, _)| n == "TRANSFER-ENCODING")
        .any(|(_, v)| v.to_ascii_lowercase().contains("chunked"))
}

/// Line iterator over an octet stream. CRLF is canonical; a bare LF also
/// terminates a line (the trailing CR is stripped); a lone CR does not.
/// When the buffer ends without a terminator, the remainder is yielded as a
/// final line.
struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
    saw_blank: bool,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            saw_blank: false,
        }
    }

    /// Bytes after the header/body separator, or empty when the blank line
    /// was never seen.
    fn rest(&self) -> &'a [u8] {
        if self.saw_blank {
            &self.buf[self.pos..]
        } else {
            &[]
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;
        let mut line = match self.buf[start..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                self.pos = start + offset + 1;
                &self.buf[start..start + offset]
            }
            None => {
                self.pos = self.buf.len();
                &self.buf[start..]
            }
        };
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }
        if line.is_empty() {
            self.saw_blank = true;
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> HttpParser {
        HttpParser::new(&ServerConfig::default())
    }

    fn parser_with(max_header: usize, max_body: usize) -> HttpParser {
        let config = ServerConfig {
            max_header_size: max_header,
            max_body_size: max_body,
            ..ServerConfig::default()
        };
        HttpParser::new(&config)
    }

    fn complete(outcome: Result<ParseOutcome, FramingError>) -> ParsedRequest {
        match outcome {
            Ok(ParseOutcome::Complete(req)) => req,
            other => panic!("expected complete request, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_get() {
        let req =
            complete(parser().parse(1, b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n"));
        assert_eq!(req.method, "GET");
        assert_eq!(req.uri, "/index.html");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.header_values("Host"), vec!["example.com"]);
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_bare_lf_line_endings_tolerated() {
        let req = complete(parser().parse(1, b"GET / HTTP/1.1\nHost: a\n\n"));
        assert_eq!(req.header_values("host"), vec!["a"]);
    }

    #[test]
    fn test_lone_cr_is_not_a_terminator() {
        // The CR stays embedded, so "Host: a\rX: b" is one header line whose
        // value contains the CR.
        let req = complete(parser().parse(1, b"GET / HTTP/1.1\r\nHost: a\rX: b\r\n\r\n"));
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_values("host"), vec!["a\rX: b"]);
    }

    #[test]
    fn test_request_line_token_count() {
        let p = parser();
        assert_eq!(
            p.parse(1, b"GET /\r\n\r\n"),
            Err(FramingError::BadMethodOrUriOrVersion)
        );
        assert_eq!(
            p.parse(2, b"GET / HTTP/1.1 extra\r\n\r\n"),
            Err(FramingError::BadMethodOrUriOrVersion)
        );
        assert_eq!(
            p.parse(3, b"\r\n\r\n"),
            Err(FramingError::BadMethodOrUriOrVersion)
        );
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_header_names_uppercased_values_trimmed() {
        let req = complete(parser().parse(1, b"GET / HTTP/1.1\r\nx-token:  \tabc \r\n\r\n"));
        assert_eq!(req.headers[0].0, "X-TOKEN");
        assert_eq!(req.headers[0].1, "abc");
    }

    #[test]
    fn test_colonless_header_lines_skipped() {
        let req = complete(parser().parse(1, b"GET / HTTP/1.1\r\ngarbage line\r\nHost: a\r\n\r\n"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_duplicate_headers_preserved_in_order() {
        let req = complete(parser().parse(
            1,
            b"GET / HTTP/1.1\r\nAccept: one\r\nAccept: two\r\n\r\n",
        ));
        assert_eq!(req.header_values("accept"), vec!["one", "two"]);
    }

    #[test]
    fn test_header_size_boundary() {
        // One header: name (5) + value (11) = 16 bytes of budget.
        let accepted =
            parser_with(16, 1024).parse(1, b"GET / HTTP/1.1\r\nX-Big: 0123456789a\r\n\r\n");
        assert!(matches!(accepted, Ok(ParseOutcome::Complete(_))));
        let rejected =
            parser_with(15, 1024).parse(1, b"GET / HTTP/1.1\r\nX-Big: 0123456789a\r\n\r\n");
        assert_eq!(rejected, Err(FramingError::BadHeadersTooLarge));
    }

    #[test]
    fn test_repeated_content_length() {
        let outcome = parser().parse(
            1,
            b"POST / HTTP/1.1\r\nContent-Length: 3\r\nContent-Length: 3\r\n\r\nabc",
        );
        assert_eq!(
            outcome,
            Err(FramingError::BadRepeatedLengthOrTransferEncodingOrBoth)
        );
    }

    #[test]
    fn test_content_length_with_transfer_encoding() {
        let outcome = parser().parse(
            1,
            b"POST / HTTP/1.1\r\nContent-Length: 3\r\nTransfer-Encoding: gzip\r\n\r\nabc",
        );
        assert_eq!(
            outcome,
            Err(FramingError::BadRepeatedLengthOrTransferEncodingOrBoth)
        );
    }

    #[test]
    fn test_chunked_transfer_encoding_unsupported() {
        let outcome = parser().parse(1, b"POST / HTTP/1.1\r\nTransfer-Encoding: Chunked\r\n\r\n");
        assert_eq!(
            outcome,
            Err(FramingError::UnsupportedTransferEncodingChunked)
        );
        assert_eq!(FramingError::UnsupportedTransferEncodingChunked.status(), 501);
    }

    #[test]
    fn test_non_chunked_transfer_encoding_yields_empty_body() {
        // Without a chunked token and without Content-Length there is no
        // body strategy, so the request completes body-less.
        let req = complete(parser().parse(1, b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_unparsable_content_length() {
        let outcome = parser().parse(1, b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n");
        assert_eq!(outcome, Err(FramingError::BadRequest));
    }

    #[test]
    fn test_zero_content_length() {
        let req = complete(parser().parse(1, b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_body_delivered_whole() {
        let body = br#"{"name":"John","age":30}"#;
        let raw = format!(
            "POST /api HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            String::from_utf8_lossy(body)
        );
        let req = complete(parser().parse(1, raw.as_bytes()));
        assert_eq!(req.body, body);
    }

    #[test]
    fn test_body_split_across_chunks() {
        let p = parser();
        let first = p.parse(1, b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello");
        match first {
            Ok(ParseOutcome::Partial(preview)) => {
                assert_eq!(preview.method, "POST");
                assert_eq!(preview.body, b"hello");
            }
            other => panic!("expected partial, got {other:?}"),
        }
        assert_eq!(p.pending_count(), 1);

        let second = p.parse(1, b"world");
        let req = complete(second);
        assert_eq!(req.body, b"helloworld");
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_continuation_preview_is_request_line_only() {
        let p = parser();
        let _ = p.parse(1, b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nab");
        match p.parse(1, b"cd") {
            Ok(ParseOutcome::Partial(preview)) => {
                assert_eq!(preview.method, "POST");
                assert!(preview.headers.is_empty());
                assert!(preview.body.is_empty());
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn test_overlong_body_single_shot() {
        let p = parser();
        let mut raw = b"POST / HTTP/1.1\r\nContent-Length: 500\r\n\r\n".to_vec();
        raw.extend(std::iter::repeat(b'x').take(1000));
        assert_eq!(p.parse(1, &raw), Err(FramingError::BadContentTooLarge));
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_overlong_body_on_continuation() {
        let p = parser();
        let _ = p.parse(1, b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabc");
        assert_eq!(p.parse(1, b"defg"), Err(FramingError::BadContentTooLarge));
        // Failed state is erased immediately.
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_max_body_size_boundary() {
        let raw = |len: usize| {
            let mut bytes =
                format!("POST / HTTP/1.1\r\nContent-Length: {len}\r\n\r\n").into_bytes();
            bytes.extend(std::iter::repeat(b'x').take(len));
            bytes
        };
        let at_limit = parser_with(8192, 32).parse(1, &raw(32));
        assert!(matches!(at_limit, Ok(ParseOutcome::Complete(_))));
        let over_limit = parser_with(8192, 32).parse(1, &raw(33));
        assert_eq!(over_limit, Err(FramingError::BadContentTooLarge));
    }

    #[test]
    fn test_segmentation_determinism() {
        // Any split of the byte stream must produce the same final request.
        let raw = b"POST /p HTTP/1.1\r\nHost: h\r\nContent-Length: 12\r\n\r\nhello world!";
        let reference = complete(parser().parse(1, raw));
        let header_end = raw.len() - 12;
        for split in header_end..raw.len() {
            let p = parser();
            let first = p.parse(7, &raw[..split]).expect("first chunk");
            assert!(matches!(first, ParseOutcome::Partial(_)), "split at {split}");
            let req = complete(p.parse(7, &raw[split..]));
            assert_eq!(req, reference, "split at {split}");
        }
    }

    #[test]
    fn test_cleanup_idle_evicts_and_reports() {
        let p = parser();
        let _ = p.parse(9, b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nab");
        let mut closed = Vec::new();
        p.cleanup_idle(Duration::from_secs(3600), |id| closed.push(id));
        assert!(closed.is_empty());
        p.cleanup_idle(Duration::ZERO, |id| closed.push(id));
        assert_eq!(closed, vec![9]);
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_forget_drops_state() {
        let p = parser();
        let _ = p.parse(4, b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nab");
        p.forget(4);
        assert_eq!(p.pending_count(), 0);
    }

    #[test]
    fn test_sentinel_strings() {
        assert_eq!(
            FramingError::BadMethodOrUriOrVersion.to_string(),
            "BAD_METHOD_OR_URI_OR_VERSION"
        );
        assert_eq!(FramingError::BadContentTooLarge.status(), 400);
    }
}
