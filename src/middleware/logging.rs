//! Stock request-logging middleware.

use tracing::info;

use super::core::{handler, Flow, Handler};

/// Middleware that logs every request's method and target, then continues
/// down the chain.
pub fn request_logger() -> Handler {
    handler(|req, _res| {
        info!(method = %req.method(), uri = %req.uri(), "request received");
        Flow::Continue
    })
}
