//! # Server Module
//!
//! The event-driven HTTP/1.1 serving core: a mio-backed readiness
//! multiplexer, the registry of accepted connections, the accept/read loop,
//! and the per-request [`Request`]/[`Response`] objects handed to the layer
//! above through [`ServerHooks`].
//!
//! ## Architecture
//!
//! ```text
//! socket bytes -> Poller -> HttpServer -> HttpParser -> ServerHooks
//!                                          (complete)    Request/Response
//! ```
//!
//! A single I/O thread drives `poll` and performs all reads and accepts;
//! responses write directly from whichever thread holds them. Connections
//! closed off the I/O thread are reconciled through a waker-backed close
//! queue, so the multiplexer's descriptor set is only ever mutated on the
//! I/O thread.

/// Connection objects and the registry that owns them
pub mod conn;
/// HTTP server shell and lifecycle hooks
pub mod core;
/// Listening-socket creation
pub mod listener;
/// Readiness multiplexer over mio
pub mod poller;
/// Move-only request object
pub mod request;
/// Move-only response builder
pub mod response;

pub use conn::{Conn, ConnRegistry};
pub use core::{HttpServer, ServerHandle, ServerHooks};
pub use poller::{IoEvent, Poller};
pub use request::Request;
pub use response::{Response, ResponseError};
