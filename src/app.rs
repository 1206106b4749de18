//! # Web Server Shell
//!
//! The Express-style layer on top of the HTTP server: route registration,
//! middleware, static file serving, the default (404) handler, the error
//! handler, and dispatch of every complete request onto the worker pool.
//!
//! ## Request Processing Flow
//!
//! 1. The HTTP server delivers a complete request/response pair.
//! 2. Requests with unknown methods are rejected with 400 immediately.
//! 3. Everything else is queued to the worker pool.
//! 4. A worker runs the pipeline: static file check, then each registered
//!    router in order, then the default handler if nothing matched.
//! 5. The response is sent and the connection closed (keep-alive is off).
//!
//! A panicking handler chain is routed through the configured error handler;
//! if that fails too, a hard-coded minimal 500 goes out and the connection is
//! closed.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::middleware::{handler, Flow, Handler};
use crate::router::Router;
use crate::server::conn::Conn;
use crate::server::{HttpServer, Request, Response, ServerHandle, ServerHooks};
use crate::static_files::{is_uri_static, StaticFiles};
use crate::worker_pool::WorkerPool;

const KNOWN_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

fn unknown_method(method: &str) -> bool {
    !KNOWN_METHODS.contains(&method)
}

/// A handler-level failure carried to the error handler.
#[derive(Debug, Clone)]
pub struct WebError {
    message: String,
    origin: String,
    status_code: u16,
    status_message: String,
}

impl WebError {
    pub fn new(message: &str, origin: &str, status_code: u16, status_message: &str) -> Self {
        Self {
            message: message.to_string(),
            origin: origin.to_string(),
            status_code,
            status_message: status_message.to_string(),
        }
    }

    /// The generic 500 used when a handler blows up.
    pub fn internal(origin: &str) -> Self {
        Self::new(
            "error in request handler",
            origin,
            500,
            "Internal Server Error",
        )
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.message, self.origin)
    }
}

impl std::error::Error for WebError {}

/// Callback invoked when a handler chain fails.
pub type ErrorHandler = Arc<dyn Fn(&mut Request, &mut Response, &WebError) + Send + Sync>;

/// Early header observation callback; runs on the I/O thread and may close
/// the connection through the `Conn` handle.
pub type HeadersCallback =
    Arc<dyn Fn(&Arc<Conn>, &[(String, String)], &str, &str, &str, &[u8]) + Send + Sync>;

/// Builder for the web server: routes, middleware, statics, error policy.
pub struct App {
    config: ServerConfig,
    routers: Vec<Router>,
    statics: StaticFiles,
    default_handler: Handler,
    error_handler: ErrorHandler,
    headers_callback: Option<HeadersCallback>,
}

impl App {
    /// Create an app with a base router at index 0; the route shortcut
    /// methods all target that router.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routers: vec![Router::new()],
            statics: StaticFiles::new(),
            default_handler: handler(|_req, res| {
                res.set_status(404, "Not Found");
                let _ = res.send_text("404 Not Found");
                Flow::Exit
            }),
            error_handler: Arc::new(|_req, res, err: &WebError| {
                error!(error = %err, "unhandled error in request pipeline");
                res.set_status(err.status_code(), err.status_message());
                let _ = res.send_text("Internal Server Error");
                res.end();
            }),
            headers_callback: None,
        }
    }

    pub fn get(&mut self, path: &str, handlers: Vec<Handler>) {
        self.routers[0].get(path, handlers);
    }

    pub fn post(&mut self, path: &str, handlers: Vec<Handler>) {
        self.routers[0].post(path, handlers);
    }

    pub fn put(&mut self, path: &str, handlers: Vec<Handler>) {
        self.routers[0].put(path, handlers);
    }

    pub fn delete(&mut self, path: &str, handlers: Vec<Handler>) {
        self.routers[0].delete(path, handlers);
    }

    pub fn patch(&mut self, path: &str, handlers: Vec<Handler>) {
        self.routers[0].patch(path, handlers);
    }

    /// Register middleware on the base router.
    pub fn use_middleware(&mut self, middleware: Handler) {
        self.routers[0].use_middleware(middleware);
    }

    /// Register an additional router; routers are tried in registration
    /// order and the first that reports "handled" wins.
    pub fn use_router(&mut self, router: Router) {
        self.routers.push(router);
    }

    /// Register a directory to serve static files from. Directories are
    /// checked in registration order.
    pub fn use_static<P: Into<PathBuf>>(&mut self, directory: P) {
        self.statics.add_root(directory);
    }

    /// Replace the default 404 handler.
    pub fn use_default(&mut self, handler: Handler) {
        self.default_handler = handler;
    }

    /// Replace the error handler invoked on handler failures.
    pub fn use_error(&mut self, handler: ErrorHandler) {
        self.error_handler = handler;
    }

    /// Observe request heads as soon as they are parsed, before the body
    /// finishes arriving.
    pub fn use_headers_received(&mut self, callback: HeadersCallback) {
        self.headers_callback = Some(callback);
    }

    /// Bind the listening socket and assemble the serving stack. The
    /// returned server still has to be [`WebServer::run`].
    pub fn bind(self, addr: SocketAddr) -> io::Result<WebServer> {
        let pool = Arc::new(WorkerPool::new(self.config.worker_threads));
        let pipeline = Arc::new(Pipeline {
            routers: self.routers,
            statics: self.statics,
            default_handler: self.default_handler,
            error_handler: self.error_handler,
        });
        let hooks = AppHooks {
            pipeline,
            pool: Arc::clone(&pool),
            headers_callback: self.headers_callback,
        };
        let http = HttpServer::bind(addr, self.config, hooks)?;
        Ok(WebServer { http, pool })
    }
}

/// A bound web server, ready to run.
pub struct WebServer {
    http: HttpServer<AppHooks>,
    pool: Arc<WorkerPool>,
}

impl WebServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.http.local_addr()
    }

    pub fn handle(&self) -> ServerHandle {
        self.http.handle()
    }

    /// Serve until the handle stops the loop, then drain and stop the
    /// worker pool.
    pub fn run(self) -> io::Result<()> {
        let result = self.http.run();
        self.pool.stop_workers();
        result
    }
}

/// Everything a worker needs to process one request.
struct Pipeline {
    routers: Vec<Router>,
    statics: StaticFiles,
    default_handler: Handler,
    error_handler: ErrorHandler,
}

impl Pipeline {
    fn run(&self, mut req: Request, mut res: Response) {
        let panicked =
            catch_unwind(AssertUnwindSafe(|| self.dispatch(&mut req, &mut res))).is_err();
        if panicked {
            error!(uri = %req.uri(), "request handler panicked");
            let err = WebError::internal("request_handler");
            let error_handler_failed = catch_unwind(AssertUnwindSafe(|| {
                (self.error_handler.as_ref())(&mut req, &mut res, &err)
            }))
            .is_err();
            if error_handler_failed {
                hard_500(&res);
                return;
            }
        }

        if let Err(err) = res.send() {
            error!(error = %err, "failed to send response");
            hard_500(&res);
            return;
        }
        // No keep-alive: every response closes its connection.
        res.end();
    }

    fn dispatch(&self, req: &mut Request, res: &mut Response) {
        let handled = if is_uri_static(req.uri()) {
            self.serve_static(req, res);
            true
        } else {
            self.routers.iter().any(|router| router.handle(req, res))
        };

        if !handled {
            (self.default_handler.as_ref())(req, res);
        }
    }

    fn serve_static(&self, req: &mut Request, res: &mut Response) {
        match self.statics.load(req.path()) {
            Ok((bytes, mime)) => {
                res.set_status(200, "OK");
                res.add_header("Content-Type", mime);
                res.set_body(bytes);
                let _ = res.send();
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                res.set_status(404, "Not Found");
                let _ = res.send_text("404 Not Found");
            }
            Err(err) => {
                error!(uri = %req.uri(), error = %err, "error serving static file");
                let web_err = WebError::new(
                    "error serving static file",
                    "serve_static",
                    500,
                    "Internal Server Error",
                );
                (self.error_handler.as_ref())(req, res, &web_err);
            }
        }
    }
}

/// Last-resort response when even the error handler failed.
fn hard_500(res: &Response) {
    const BODY: &str = "Internal Server Error";
    let message = format!(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{BODY}",
        BODY.len()
    );
    let _ = res.conn().write(message.as_bytes());
    res.conn().close();
}

/// Bridge from HTTP server callbacks into the web layer.
struct AppHooks {
    pipeline: Arc<Pipeline>,
    pool: Arc<WorkerPool>,
    headers_callback: Option<HeadersCallback>,
}

impl ServerHooks for AppHooks {
    fn on_request_received(&self, request: Request, mut response: Response) {
        if unknown_method(request.method()) {
            warn!(method = %request.method(), "unknown HTTP method");
            response.set_status(400, "Bad Request");
            let _ = response.send_text(&format!("400 Bad Request: {}", request.method()));
            response.end();
            return;
        }

        let pipeline = Arc::clone(&self.pipeline);
        self.pool.enqueue(move || pipeline.run(request, response));
    }

    fn on_listen_success(&self) {
        info!("web server accepting requests");
    }

    fn on_headers_received(
        &self,
        conn: &Arc<Conn>,
        headers: &[(String, String)],
        method: &str,
        uri: &str,
        version: &str,
        partial_body: &[u8],
    ) {
        if let Some(callback) = &self.headers_callback {
            (callback.as_ref())(conn, headers, method, uri, version, partial_body);
        }
    }

    fn on_exception_occurred(&self, err: &io::Error) {
        error!(error = %err, "socket exception");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method() {
        assert!(!unknown_method("GET"));
        assert!(!unknown_method("OPTIONS"));
        assert!(unknown_method("BREW"));
        assert!(unknown_method("get"));
    }

    #[test]
    fn test_web_error_display() {
        let err = WebError::internal("request_handler");
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("request_handler"));
    }
}
