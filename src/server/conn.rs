//! Accepted connections and the registry that owns them.
//!
//! A [`Conn`] is identified by a stable, monotonically assigned id that is
//! never reused, so a late close request can never hit a recycled socket.
//! The registry maps ids to live connections; its entry set mirrors the
//! multiplexer's watched set minus the listener.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mio::net::TcpStream;
use mio::Waker;
use tracing::{debug, trace};

/// One accepted TCP stream.
///
/// The registry holds the owning reference; the request/response pair for the
/// in-flight request shares it. After [`Conn::close`] any further write is a
/// no-op and any further read yields end-of-stream.
pub struct Conn {
    id: u64,
    peer: SocketAddr,
    local: Option<SocketAddr>,
    stream: Mutex<TcpStream>,
    closed: AtomicBool,
    signal: Arc<CloseSignal>,
}

impl Conn {
    pub(crate) fn new(
        id: u64,
        peer: SocketAddr,
        stream: TcpStream,
        signal: Arc<CloseSignal>,
    ) -> Self {
        let local = stream.local_addr().ok();
        Self {
            id,
            peer,
            local,
            stream: Mutex::new(stream),
            closed: AtomicBool::new(false),
            signal,
        }
    }

    /// Stable connection identifier (never reused within a server).
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Write the whole buffer to the peer.
    ///
    /// The socket is nonblocking, so short writes are retried until every
    /// byte is accepted or the connection is deemed broken. Writing to a
    /// closed connection is a no-op.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        let mut stream = self.stream.lock().unwrap();
        let mut written = 0;
        while written < bytes.len() {
            match stream.write(&bytes[written..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "peer stopped accepting bytes",
                    ))
                }
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        trace!(conn_id = self.id, bytes = bytes.len(), "wrote response bytes");
        Ok(())
    }

    /// Read available bytes into `buf`. Used by the I/O thread only.
    /// Returns `Ok(0)` (end-of-stream) once the connection is closed.
    pub(crate) fn read_chunk(&self, buf: &mut [u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Ok(0);
        }
        self.stream.lock().unwrap().read(buf)
    }

    /// Close the connection. Idempotent; safe from any thread.
    ///
    /// Shuts the socket down immediately and notifies the I/O loop so the
    /// registry entry and any multiplexer registration are released there.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(conn_id = self.id, peer = %self.peer, "closing connection");
        if let Ok(stream) = self.stream.lock() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        self.signal.notify(self.id);
    }

    pub(crate) fn with_stream<R>(&self, f: impl FnOnce(&mut TcpStream) -> R) -> R {
        f(&mut self.stream.lock().unwrap())
    }
}

/// Queue of connection ids whose sockets were shut down off the I/O thread.
///
/// The I/O loop drains it after every poll wake-up and performs the actual
/// deregistration, keeping all multiplexer mutation on one thread.
pub(crate) struct CloseSignal {
    pending: Mutex<Vec<u64>>,
    waker: Arc<Waker>,
}

impl CloseSignal {
    pub(crate) fn new(waker: Arc<Waker>) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            waker,
        }
    }

    fn notify(&self, conn_id: u64) {
        self.pending.lock().unwrap().push(conn_id);
        let _ = self.waker.wake();
    }

    pub(crate) fn drain(&self) -> Vec<u64> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }
}

/// Owner of all accepted connections, keyed by stable id.
pub struct ConnRegistry {
    conns: Mutex<HashMap<u64, Arc<Conn>>>,
}

impl ConnRegistry {
    pub fn new() -> Self {
        Self {
            conns: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, conn: Arc<Conn>) {
        self.conns.lock().unwrap().insert(conn.id(), conn);
    }

    pub fn get(&self, conn_id: u64) -> Option<Arc<Conn>> {
        self.conns.lock().unwrap().get(&conn_id).cloned()
    }

    pub fn remove(&self, conn_id: u64) -> Option<Arc<Conn>> {
        self.conns.lock().unwrap().remove(&conn_id)
    }

    /// Close a connection through the registry. This is the idle sweeper's
    /// entry point: it never touches raw descriptors, so a recycled socket
    /// can never be hit by mistake.
    pub fn close_by_id(&self, conn_id: u64) {
        if let Some(conn) = self.get(conn_id) {
            conn.close();
        }
    }

    pub fn len(&self) -> usize {
        self.conns.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain(&self) -> Vec<Arc<Conn>> {
        self.conns.lock().unwrap().drain().map(|(_, c)| c).collect()
    }
}

impl Default for ConnRegistry {
    fn default() -> Self {
        Self::new()
    }
}
