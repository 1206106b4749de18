mod core;
mod logging;

pub use core::{handler, Flow, Handler};
pub use logging::request_logger;
