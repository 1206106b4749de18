use std::io;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use oxpress::{handler, request_logger, App, Flow, ServerConfig};

#[derive(Serialize)]
struct UserReply {
    id: String,
    name: String,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut app = App::new(ServerConfig::from_env());
    app.use_middleware(request_logger());

    app.get(
        "/",
        vec![handler(|_req, res| {
            let _ = res.send_html("<h1>oxpress</h1><p>It works.</p>");
            Flow::Exit
        })],
    );

    app.get(
        "/users/:id",
        vec![handler(|req, res| {
            let reply = UserReply {
                id: req.path_param("id").unwrap_or_default().to_string(),
                name: req.query_param("name").unwrap_or("anonymous").to_string(),
            };
            match serde_json::to_string(&reply) {
                Ok(body) => {
                    let _ = res.send_json(&body);
                    Flow::Exit
                }
                Err(_) => Flow::Error,
            }
        })],
    );

    app.post(
        "/echo",
        vec![handler(|req, res| {
            res.add_header("Content-Type", "application/octet-stream");
            res.set_body(req.body().to_vec());
            let _ = res.send();
            Flow::Exit
        })],
    );

    app.use_static("./public");

    let addr = "127.0.0.1:8080".parse().map_err(io::Error::other)?;
    let server = app.bind(addr)?;
    info!(addr = %server.local_addr(), "demo server running");
    server.run()
}
