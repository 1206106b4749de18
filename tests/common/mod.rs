use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread::JoinHandle;
use std::time::Duration;

use oxpress::{App, ServerHandle};

/// A web server running on an ephemeral port in a background thread.
pub struct RunningServer {
    pub addr: std::net::SocketAddr,
    pub handle: ServerHandle,
    join: Option<JoinHandle<std::io::Result<()>>>,
}

#[allow(dead_code)]
impl RunningServer {
    pub fn start(app: App) -> Self {
        let server = app.bind("127.0.0.1:0".parse().unwrap()).expect("bind");
        let addr = server.local_addr();
        let handle = server.handle();
        let join = std::thread::spawn(move || server.run());
        handle.wait_ready().expect("server ready");
        Self {
            addr,
            handle,
            join: Some(join),
        }
    }

    /// Send raw bytes and read the whole response until the server closes
    /// the connection.
    pub fn roundtrip(&self, raw: &[u8]) -> String {
        let mut stream = TcpStream::connect(self.addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        stream.write_all(raw).expect("write request");
        let mut response = Vec::new();
        stream.read_to_end(&mut response).expect("read response");
        String::from_utf8_lossy(&response).into_owned()
    }

    /// Like [`RunningServer::roundtrip`], but delivering the request in two
    /// chunks with a pause in between.
    pub fn roundtrip_split(&self, first: &[u8], second: &[u8], pause: Duration) -> String {
        let mut stream = TcpStream::connect(self.addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        stream.write_all(first).expect("write first chunk");
        stream.flush().unwrap();
        std::thread::sleep(pause);
        stream.write_all(second).expect("write second chunk");
        let mut response = Vec::new();
        stream.read_to_end(&mut response).expect("read response");
        String::from_utf8_lossy(&response).into_owned()
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(join) = self.join.take() {
            self.handle.stop();
            let _ = join.join().expect("server thread");
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Split the status line off a raw HTTP response.
#[allow(dead_code)]
pub fn status_line(response: &str) -> &str {
    response.split("\r\n").next().unwrap_or("")
}

/// Body of a raw HTTP response (everything after the blank line).
#[allow(dead_code)]
pub fn body_of(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}
