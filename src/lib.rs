pub mod app;
pub mod config;
pub mod middleware;
pub mod parser;
pub mod router;
pub mod server;
pub mod static_files;
pub mod worker_pool;

pub use app::{App, ErrorHandler, WebError, WebServer};
pub use config::ServerConfig;
pub use middleware::{handler, request_logger, Flow, Handler};
pub use parser::{FramingError, HttpParser, ParseOutcome, ParsedRequest};
pub use router::{match_path, Route, Router};
pub use server::{
    Conn, HttpServer, Request, Response, ResponseError, ServerHandle, ServerHooks,
};
