//! HTTP/1.1 response builder bound to its owning connection.
//!
//! A `Response` is move-only and walks a one-way state machine:
//! `Building -> Sent` on [`Response::send`], any state -> `Closed` on
//! [`Response::end`] (or when the connection goes away underneath it). A
//! second `send()` is a no-op, so the connection can never be double-framed.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::server::conn::Conn;

/// Why a response could not be sent.
#[derive(Debug)]
pub enum ResponseError {
    /// Status code outside `100..600`.
    InvalidStatus(u16),
    /// The HTTP version string was cleared.
    MissingVersion,
    /// The connection rejected the bytes.
    Io(io::Error),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::InvalidStatus(code) => {
                write!(f, "invalid response status code {code}")
            }
            ResponseError::MissingVersion => write!(f, "response HTTP version is empty"),
            ResponseError::Io(err) => write!(f, "failed writing response: {err}"),
        }
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResponseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Building,
    Sent,
    Closed,
}

pub struct Response {
    conn: Arc<Conn>,
    version: String,
    status_code: u16,
    status_message: String,
    headers: Vec<(String, String)>,
    trailers: Vec<(String, String)>,
    body: Vec<u8>,
    state: State,
}

impl Response {
    pub(crate) fn new(conn: Arc<Conn>) -> Self {
        Self {
            conn,
            version: "HTTP/1.1".to_string(),
            status_code: 200,
            status_message: "OK".to_string(),
            headers: Vec::new(),
            trailers: Vec::new(),
            body: Vec::new(),
            state: State::Building,
        }
    }

    pub fn set_status(&mut self, code: u16, message: &str) {
        self.status_code = code;
        self.status_message = message.to_string();
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Drop every value previously added for `name` (case-insensitive).
    pub fn clear_header_values(&mut self, name: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Record a trailer for the chunked-encoding extension point.
    pub fn add_trailer(&mut self, name: &str, value: &str) {
        self.trailers.push((name.to_string(), value.to_string()));
    }

    pub fn trailer_values(&self, name: &str) -> Vec<&str> {
        self.trailers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_sent(&self) -> bool {
        self.state != State::Building
    }

    /// Set the body and `Content-Type: text/plain`, then send.
    pub fn send_text(&mut self, text: &str) -> Result<(), ResponseError> {
        self.add_header("Content-Type", "text/plain");
        self.set_body(text);
        self.send()
    }

    /// Set the body and `Content-Type: text/html`, then send.
    pub fn send_html(&mut self, html: &str) -> Result<(), ResponseError> {
        self.add_header("Content-Type", "text/html");
        self.set_body(html);
        self.send()
    }

    /// Set the body and `Content-Type: application/json`, then send.
    pub fn send_json(&mut self, json: &str) -> Result<(), ResponseError> {
        self.add_header("Content-Type", "application/json");
        self.set_body(json);
        self.send()
    }

    /// Serialize and transmit the response on the owning connection.
    ///
    /// `Content-Length` is computed from the body when not already set, and
    /// `Connection: close` is added unconditionally. The first call moves the
    /// response to `Sent`; later calls are no-ops.
    pub fn send(&mut self) -> Result<(), ResponseError> {
        if self.state != State::Building {
            return Ok(());
        }
        if !(100..600).contains(&self.status_code) {
            return Err(ResponseError::InvalidStatus(self.status_code));
        }
        if self.version.is_empty() {
            return Err(ResponseError::MissingVersion);
        }

        let bytes = self.to_bytes();
        self.conn.write(&bytes).map_err(ResponseError::Io)?;
        self.state = State::Sent;
        Ok(())
    }

    /// Close the underlying connection. Idempotent.
    pub fn end(&mut self) {
        self.state = State::Closed;
        self.conn.close();
    }

    /// Reserved for the chunked-encoding extension point; trailers are
    /// recorded but nothing is emitted while chunked bodies are unsupported.
    pub fn send_trailers(&mut self) -> Result<(), ResponseError> {
        Ok(())
    }

    /// Canonical wire framing of the response as currently built.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128 + self.body.len());
        out.extend_from_slice(
            format!(
                "{} {} {}\r\n",
                self.version, self.status_code, self.status_message
            )
            .as_bytes(),
        );
        for (name, value) in &self.headers {
            out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        let has_content_length = self
            .headers
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case("content-length"));
        if !has_content_length {
            out.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        out.extend_from_slice(b"Connection: close\r\n\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    pub(crate) fn conn(&self) -> &Arc<Conn> {
        &self.conn
    }
}
