//! Readiness multiplexer over `mio::Poll` (epoll on Linux).
//!
//! Watches the listening socket plus every accepted connection and reports
//! which of them are readable, writable, or hung up. The descriptor set is
//! owned by the I/O thread; other threads request changes indirectly (the
//! connection close path wakes the loop through the [`mio::Waker`]).

use std::io;
use std::sync::Arc;
use std::time::Duration;

use mio::event::Source;
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token, Waker};

/// Token of the listening socket.
pub const LISTENER: Token = Token(0);
/// Token of the cross-thread waker.
pub const WAKER: Token = Token(1);
/// First token handed to an accepted connection.
pub const FIRST_CONN: usize = 2;

/// One readiness report from [`Poller::poll`].
#[derive(Debug, Clone, Copy)]
pub struct IoEvent {
    pub token: Token,
    pub readable: bool,
    pub writable: bool,
    pub hangup: bool,
}

/// Thin wrapper owning the `mio::Poll` and its reusable event buffer.
pub struct Poller {
    poll: Poll,
    events: Events,
}

impl Poller {
    pub fn new(capacity_hint: usize) -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(capacity_hint.max(8)),
        })
    }

    /// Build the waker used to interrupt a pending [`Poller::poll`] from
    /// another thread.
    pub fn waker(&self) -> io::Result<Arc<Waker>> {
        Ok(Arc::new(Waker::new(self.poll.registry(), WAKER)?))
    }

    pub fn register_listener(&self, listener: &mut TcpListener) -> io::Result<()> {
        self.poll
            .registry()
            .register(listener, LISTENER, Interest::READABLE)
    }

    /// Start watching an accepted connection's readable side.
    pub fn register_conn<S: Source>(&self, source: &mut S, token: Token) -> io::Result<()> {
        self.poll
            .registry()
            .register(source, token, Interest::READABLE)
    }

    /// Temporarily stop watching a connection's readable side.
    pub fn disable_read<S: Source>(&self, source: &mut S) -> io::Result<()> {
        self.poll.registry().deregister(source)
    }

    /// Resume watching a connection previously paused with
    /// [`Poller::disable_read`].
    pub fn enable_read<S: Source>(&self, source: &mut S, token: Token) -> io::Result<()> {
        self.register_conn(source, token)
    }

    pub fn deregister<S: Source>(&self, source: &mut S) -> io::Result<()> {
        self.poll.registry().deregister(source)
    }

    /// Wait for readiness for at most `timeout`, returning the ready batch.
    /// An empty batch means the wait timed out (or was interrupted by a
    /// signal, which is not an error).
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Vec<IoEvent>> {
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => return Ok(Vec::new()),
            Err(err) => return Err(err),
        }
        Ok(self
            .events
            .iter()
            .map(|event| IoEvent {
                token: event.token(),
                readable: event.is_readable(),
                writable: event.is_writable(),
                hangup: event.is_read_closed() || event.is_write_closed() || event.is_error(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::listener::make_listener;

    #[test]
    fn test_poll_times_out_with_empty_batch() {
        let mut poller = Poller::new(8).unwrap();
        let events = poller.poll(Duration::from_millis(10)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_listener_becomes_readable_on_connect() {
        let mut poller = Poller::new(8).unwrap();
        let mut listener = make_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let addr = listener.local_addr().unwrap();
        poller.register_listener(&mut listener).unwrap();

        let _client = std::net::TcpStream::connect(addr).unwrap();
        let mut saw_listener = false;
        for _ in 0..50 {
            let events = poller.poll(Duration::from_millis(100)).unwrap();
            if events.iter().any(|e| e.token == LISTENER && e.readable) {
                saw_listener = true;
                break;
            }
        }
        assert!(saw_listener);
    }

    #[test]
    fn test_waker_interrupts_poll() {
        let mut poller = Poller::new(8).unwrap();
        let waker = poller.waker().unwrap();
        let handle = std::thread::spawn(move || waker.wake());
        // Generous timeout: the wake must cut it short.
        let _ = poller.poll(Duration::from_secs(5)).unwrap();
        handle.join().unwrap().unwrap();
    }
}
