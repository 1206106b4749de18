//! # Router Core
//!
//! Matches `(method, path)` pairs against ordered route expressions and runs
//! middleware and handler chains.
//!
//! ## Matching
//!
//! A route expression and a request path are both split on `/` into
//! non-empty segments. They match iff they have the same number of segments
//! and each expression segment is either byte-equal to the request segment
//! or a `:name` parameter segment, which captures the request segment.
//! Matching is case-sensitive; there is no wildcard catch-all. Insertion
//! order defines priority: the first route whose method and expression both
//! match wins.

use std::collections::HashMap;

use http::Method;
use tracing::debug;

use crate::middleware::{Flow, Handler};
use crate::server::{Request, Response};

/// Match a route expression against a request path, capturing `:name`
/// segments. Returns `None` when the shapes differ.
pub fn match_path(expression: &str, path: &str) -> Option<HashMap<String, String>> {
    let expr_segments: Vec<&str> = expression.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if expr_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (expr, actual) in expr_segments.iter().zip(&path_segments) {
        if let Some(name) = expr.strip_prefix(':') {
            params.insert(name.to_string(), (*actual).to_string());
        } else if expr != actual {
            return None;
        }
    }
    Some(params)
}

/// One route: an HTTP method, a path expression, and its handler chain.
pub struct Route {
    method: Method,
    expression: String,
    handlers: Vec<Handler>,
}

impl Route {
    /// Create a route.
    ///
    /// # Panics
    ///
    /// Panics when `handlers` is empty; a route without handlers is a
    /// programming error.
    pub fn new(method: Method, expression: &str, handlers: Vec<Handler>) -> Self {
        assert!(
            !handlers.is_empty(),
            "a route must carry at least one handler"
        );
        Self {
            method,
            expression: expression.to_string(),
            handlers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn matches(&self, request: &Request) -> Option<HashMap<String, String>> {
        if self.method.as_str() != request.method() {
            return None;
        }
        match_path(&self.expression, request.path())
    }
}

/// Ordered middleware plus ordered routes.
///
/// Multiple routers can be registered with the web server; each reports
/// whether it handled a request so the server can fall through to the next
/// one, and finally to the default handler.
#[derive(Default)]
pub struct Router {
    middlewares: Vec<Handler>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register middleware that runs before any route handler. Middleware is
    /// executed in registration order and can short-circuit the pipeline.
    pub fn use_middleware(&mut self, middleware: Handler) {
        self.middlewares.push(middleware);
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn get(&mut self, expression: &str, handlers: Vec<Handler>) {
        self.add_route(Route::new(Method::GET, expression, handlers));
    }

    pub fn post(&mut self, expression: &str, handlers: Vec<Handler>) {
        self.add_route(Route::new(Method::POST, expression, handlers));
    }

    pub fn put(&mut self, expression: &str, handlers: Vec<Handler>) {
        self.add_route(Route::new(Method::PUT, expression, handlers));
    }

    pub fn delete(&mut self, expression: &str, handlers: Vec<Handler>) {
        self.add_route(Route::new(Method::DELETE, expression, handlers));
    }

    pub fn patch(&mut self, expression: &str, handlers: Vec<Handler>) {
        self.add_route(Route::new(Method::PATCH, expression, handlers));
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Walk middleware, then routes. Returns true when the request was
    /// handled (middleware short-circuited, or a route matched), false when
    /// the caller should fall through.
    pub fn handle(&self, request: &mut Request, response: &mut Response) -> bool {
        for middleware in &self.middlewares {
            match (middleware.as_ref())(request, response) {
                Flow::Continue => {}
                Flow::Exit | Flow::Error => return true,
            }
        }

        for route in &self.routes {
            if let Some(params) = route.matches(request) {
                debug!(
                    method = %request.method(),
                    path = %request.path(),
                    expression = %route.expression,
                    "route matched"
                );
                request.set_path_params(params);
                run_chain(&route.handlers, request, response);
                return true;
            }
        }

        false
    }
}

fn run_chain(handlers: &[Handler], request: &mut Request, response: &mut Response) -> Flow {
    for handler in handlers {
        match (handler.as_ref())(request, response) {
            Flow::Continue => {}
            Flow::Exit => return Flow::Exit,
            Flow::Error => return Flow::Error,
        }
    }
    Flow::Exit
}
