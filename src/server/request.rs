//! Read-only view of one parsed request, bound to its connection.
//!
//! `Request` is move-only by construction: it is not `Clone`, so exactly one
//! owner (the handler task) can hold it at a time and the underlying
//! connection cannot be double-driven.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::parser::ParsedRequest;
use crate::server::conn::Conn;

pub struct Request {
    inner: ParsedRequest,
    path_params: HashMap<String, String>,
    query_params: OnceCell<HashMap<String, String>>,
    conn: Arc<Conn>,
}

impl Request {
    pub(crate) fn new(inner: ParsedRequest, conn: Arc<Conn>) -> Self {
        Self {
            inner,
            path_params: HashMap::new(),
            query_params: OnceCell::new(),
            conn,
        }
    }

    /// Method token exactly as received (uppercase by convention, but unknown
    /// tokens pass through so the web layer can reject them).
    pub fn method(&self) -> &str {
        &self.inner.method
    }

    /// Request target verbatim: path plus optional query string.
    pub fn uri(&self) -> &str {
        &self.inner.uri
    }

    /// Path portion of the target (everything before `?`).
    pub fn path(&self) -> &str {
        match self.inner.uri.find('?') {
            Some(pos) => &self.inner.uri[..pos],
            None => &self.inner.uri,
        }
    }

    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Full header list in arrival order (names uppercase).
    pub fn headers(&self) -> &[(String, String)] {
        &self.inner.headers
    }

    /// All values for `name`, compared ASCII case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.inner.header_values(name)
    }

    /// First value for `name`, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }

    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.inner.body)
    }

    /// Parameters captured from `:name` segments by the router.
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub(crate) fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = params;
    }

    /// Query parameters, parsed (and percent-decoded) lazily from the target.
    pub fn query_params(&self) -> &HashMap<String, String> {
        self.query_params.get_or_init(|| {
            let query = match self.inner.uri.find('?') {
                Some(pos) => &self.inner.uri[pos + 1..],
                None => return HashMap::new(),
            };
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params().get(name).map(String::as_str)
    }

    /// Keep-alive hint. Reserved: always false, every response closes its
    /// connection.
    pub fn keep_alive(&self) -> bool {
        false
    }

    /// One-shot teardown: closes the underlying connection.
    pub fn destroy(self) {
        self.conn.close();
    }
}
