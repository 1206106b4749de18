//! # Router Module
//!
//! Route registration, path-expression matching with `:name` parameters, and
//! the middleware/handler chain walk.
//!
//! Routes are tried in insertion order; the first one whose method equals the
//! request method and whose expression matches the request path wins. On a
//! match the router injects the captured path parameters into the request
//! before running the route's handler chain.

mod core;

pub use core::{match_path, Route, Router};
