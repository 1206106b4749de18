//! # HTTP Server Shell
//!
//! Owns the readiness multiplexer, the connection registry, and the
//! incremental parser, and drives the accept/read loop on a single I/O
//! thread. Everything the layer above needs to observe is exposed through
//! the [`ServerHooks`] callbacks.
//!
//! ## Lifecycle
//!
//! ```text
//! bind() -> run(): on_listen_success
//!                  loop: poll -> accept / read -> parse -> hooks
//!                  stop(): close everything -> on_shutdown_success
//! ```
//!
//! A dedicated sweeper thread evicts in-flight requests whose connections
//! have gone quiet for longer than `max_idle_time`, closing them through the
//! registry. Every response closes its connection after transmission; there
//! is no keep-alive.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mio::net::TcpListener;
use mio::{Token, Waker};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::parser::{FramingError, HttpParser, ParseOutcome, ParsedRequest};
use crate::server::conn::{CloseSignal, Conn, ConnRegistry};
use crate::server::listener::make_listener;
use crate::server::poller::{IoEvent, Poller, FIRST_CONN, LISTENER, WAKER};
use crate::server::request::Request;
use crate::server::response::Response;

/// Observer and dispatcher callbacks for the HTTP server.
///
/// Implementations override what they need; only
/// [`ServerHooks::on_request_received`] is mandatory. All hooks are invoked
/// on the I/O thread, so they should hand heavy work off quickly.
pub trait ServerHooks: Send + Sync {
    /// A complete, well-framed request arrived. The receiver owns both
    /// objects and is responsible for sending and ending the response.
    fn on_request_received(&self, request: Request, response: Response);

    /// Fired once after bind/listen succeeds.
    fn on_listen_success(&self) {}

    fn on_connection_opened(&self, _conn: &Arc<Conn>) {}

    /// Raw chunk hook, called before the chunk reaches the parser.
    fn on_message_received(&self, _conn: &Arc<Conn>, _bytes: &[u8]) {}

    /// The request line and headers of a request are known, even if its body
    /// is still arriving. May close the connection to refuse the request.
    fn on_headers_received(
        &self,
        _conn: &Arc<Conn>,
        _headers: &[(String, String)],
        _method: &str,
        _uri: &str,
        _version: &str,
        _partial_body: &[u8],
    ) {
    }

    /// The parser rejected the connection's bytes. No request object exists;
    /// the default answers with a minimal `400`/`501` and closes.
    fn on_bad_request(&self, conn: &Arc<Conn>, err: &FramingError) {
        let status = err.status();
        let reason = if status == 501 {
            "Not Implemented"
        } else {
            "Bad Request"
        };
        let body = err.sentinel();
        let message = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = conn.write(message.as_bytes());
        conn.close();
    }

    fn on_connection_closed(&self, _conn: &Arc<Conn>) {}

    /// A transport-level failure on one connection or on the multiplexer.
    /// The server keeps running; only the affected connection is dropped.
    fn on_exception_occurred(&self, _err: &io::Error) {}

    fn on_shutdown_success(&self) {}

    /// Fired on every poll iteration.
    fn on_waiting_for_activity(&self) {}
}

/// Remote control for a running [`HttpServer`].
#[derive(Clone)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Ask the poll loop to stop at its next iteration.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _ = self.waker.wake();
    }

    /// Block until the server accepts TCP connections.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if std::net::TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }
}

/// Event-driven HTTP/1.1 server: one I/O thread, callback-based dispatch.
pub struct HttpServer<H: ServerHooks> {
    config: ServerConfig,
    poller: Poller,
    listener: TcpListener,
    local_addr: SocketAddr,
    waker: Arc<Waker>,
    shutdown: Arc<AtomicBool>,
    registry: Arc<ConnRegistry>,
    parser: Arc<HttpParser>,
    close_signal: Arc<CloseSignal>,
    hooks: Arc<H>,
    next_token: usize,
}

impl<H: ServerHooks + 'static> HttpServer<H> {
    /// Bind the listening socket and set up the multiplexer. Errors here are
    /// fatal: the server never starts serving.
    pub fn bind(addr: SocketAddr, config: ServerConfig, hooks: H) -> io::Result<Self> {
        let poller = Poller::new(config.max_events)?;
        let mut listener = make_listener(addr, config.backlog)?;
        let local_addr = listener.local_addr()?;
        poller.register_listener(&mut listener)?;
        let waker = poller.waker()?;
        let parser = Arc::new(HttpParser::new(&config));

        Ok(Self {
            close_signal: Arc::new(CloseSignal::new(Arc::clone(&waker))),
            config,
            poller,
            listener,
            local_addr,
            waker,
            shutdown: Arc::new(AtomicBool::new(false)),
            registry: Arc::new(ConnRegistry::new()),
            parser,
            hooks: Arc::new(hooks),
            next_token: FIRST_CONN,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            addr: self.local_addr,
            shutdown: Arc::clone(&self.shutdown),
            waker: Arc::clone(&self.waker),
        }
    }

    /// Drive the server until [`ServerHandle::stop`] is called. Blocks the
    /// calling thread, which becomes the I/O thread.
    pub fn run(mut self) -> io::Result<()> {
        info!(addr = %self.local_addr, "listening");
        self.hooks.on_listen_success();
        let _sweeper = self.spawn_idle_sweeper();

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let events = match self.poller.poll(self.config.poll_timeout) {
                Ok(events) => events,
                Err(err) => {
                    error!(error = %err, "poll failed");
                    self.hooks.on_exception_occurred(&err);
                    continue;
                }
            };

            self.hooks.on_waiting_for_activity();

            for event in events {
                match event.token {
                    LISTENER => self.accept_ready(),
                    WAKER => {}
                    token => self.conn_ready(token, &event),
                }
            }

            self.drain_closed();
        }

        self.teardown();
        Ok(())
    }

    fn spawn_idle_sweeper(&self) -> crossbeam_channel::Sender<()> {
        let parser = Arc::clone(&self.parser);
        let registry = Arc::clone(&self.registry);
        let max_idle = self.config.max_idle_time;
        // Dropping the sender (when the server is torn down) stops the loop.
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let spawned = std::thread::Builder::new()
            .name("oxpress-idle-sweeper".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(max_idle) {
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                        parser.cleanup_idle(max_idle, |conn_id| {
                            warn!(conn_id, "closing idle connection");
                            registry.close_by_id(conn_id);
                        });
                    }
                    _ => return,
                }
            });
        if let Err(err) = spawned {
            error!(error = %err, "failed to spawn idle sweeper; idle eviction disabled");
        }
        stop_tx
    }

    fn accept_ready(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    let token = Token(self.next_token);
                    self.next_token += 1;
                    if let Err(err) = self.poller.register_conn(&mut stream, token) {
                        // Registration failure is fatal to this handle only.
                        error!(peer = %peer, error = %err, "failed to register connection");
                        self.hooks.on_exception_occurred(&err);
                        continue;
                    }
                    let conn = Arc::new(Conn::new(
                        token.0 as u64,
                        peer,
                        stream,
                        Arc::clone(&self.close_signal),
                    ));
                    self.registry.insert(Arc::clone(&conn));
                    debug!(conn_id = conn.id(), peer = %peer, "connection opened");
                    self.hooks.on_connection_opened(&conn);
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    error!(error = %err, "accept failed");
                    self.hooks.on_exception_occurred(&err);
                    break;
                }
            }
        }
    }

    fn conn_ready(&mut self, token: Token, event: &IoEvent) {
        let conn_id = token.0 as u64;
        let Some(conn) = self.registry.get(conn_id) else {
            return;
        };

        if event.readable {
            self.read_available(&conn);
        }
        if event.hangup && self.registry.get(conn_id).is_some() {
            self.close_conn(&conn);
        }
    }

    fn read_available(&mut self, conn: &Arc<Conn>) {
        let mut buf = vec![0u8; self.config.read_buffer_size];
        loop {
            match conn.read_chunk(&mut buf) {
                Ok(0) => {
                    self.close_conn(conn);
                    return;
                }
                Ok(n) => {
                    let chunk = &buf[..n];
                    self.hooks.on_message_received(conn, chunk);
                    if !self.feed_parser(conn, chunk) {
                        return;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    warn!(conn_id = conn.id(), error = %err, "read failed");
                    self.hooks.on_exception_occurred(&err);
                    self.close_conn(conn);
                    return;
                }
            }
        }
    }

    /// Feed one chunk to the parser and dispatch on the outcome. Returns
    /// false when the read loop for this connection should stop.
    fn feed_parser(&mut self, conn: &Arc<Conn>, chunk: &[u8]) -> bool {
        match self.parser.parse(conn.id(), chunk) {
            Ok(ParseOutcome::Partial(preview)) => {
                self.notify_headers(conn, &preview);
                true
            }
            Ok(ParseOutcome::Complete(parsed)) => {
                self.notify_headers(conn, &parsed);
                // One request per connection: stop watching the read side.
                let _ = conn.with_stream(|s| self.poller.disable_read(s));
                let request = Request::new(parsed, Arc::clone(conn));
                let response = Response::new(Arc::clone(conn));
                self.hooks.on_request_received(request, response);
                false
            }
            Err(err) => {
                warn!(conn_id = conn.id(), error = %err, "framing error");
                self.parser.forget(conn.id());
                let _ = conn.with_stream(|s| self.poller.disable_read(s));
                self.hooks.on_bad_request(conn, &err);
                false
            }
        }
    }

    fn notify_headers(&self, conn: &Arc<Conn>, parsed: &ParsedRequest) {
        self.hooks.on_headers_received(
            conn,
            &parsed.headers,
            &parsed.method,
            &parsed.uri,
            &parsed.version,
            &parsed.body,
        );
    }

    /// Release everything the server holds for a connection.
    fn close_conn(&mut self, conn: &Arc<Conn>) {
        if self.registry.remove(conn.id()).is_none() {
            return;
        }
        let _ = conn.with_stream(|s| self.poller.deregister(s));
        self.parser.forget(conn.id());
        conn.close();
        debug!(conn_id = conn.id(), "connection closed");
        self.hooks.on_connection_closed(conn);
    }

    /// Handle sockets shut down off the I/O thread (response `end()`, the
    /// idle sweeper): their registry entries and registrations are released
    /// here, keeping all multiplexer mutation on this thread.
    fn drain_closed(&mut self) {
        for conn_id in self.close_signal.drain() {
            if let Some(conn) = self.registry.get(conn_id) {
                self.close_conn(&conn);
            }
        }
    }

    fn teardown(&mut self) {
        for conn in self.registry.drain() {
            let _ = conn.with_stream(|s| self.poller.deregister(s));
            self.parser.forget(conn.id());
            conn.close();
            self.hooks.on_connection_closed(&conn);
        }
        let _ = self.poller.deregister(&mut self.listener);
        info!(addr = %self.local_addr, "server stopped");
        self.hooks.on_shutdown_success();
    }
}
