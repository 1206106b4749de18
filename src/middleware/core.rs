//! Handler-chain contract shared by middleware and route handlers.

use std::sync::Arc;

use crate::server::{Request, Response};

/// Control code returned by every handler in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next handler in the chain.
    Continue,
    /// Stop the chain; the request is handled.
    Exit,
    /// Stop the chain, signalling a handler-level failure.
    Error,
}

/// A single step in a middleware or route handler chain.
///
/// Middleware and route handlers share this shape: they receive the request
/// and the response under construction and decide whether the walk goes on.
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response) -> Flow + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Request, &mut Response) -> Flow + Send + Sync + 'static,
{
    Arc::new(f)
}
