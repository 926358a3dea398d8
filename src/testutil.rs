//! Canned-response HTTP server for exercising the real reqwest paths in tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Canned {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn new(status: &'static str, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn json(status: &'static str, body: &str) -> Self {
        Self::new(status, "application/json", body)
    }

    pub fn html(status: &'static str, body: &str) -> Self {
        Self::new(status, "text/html; charset=utf-8", body)
    }
}

/// Listens on an ephemeral 127.0.0.1 port. Bind first so URLs pointing back at
/// the server can go into the canned bodies.
pub struct TestServer {
    listener: TcpListener,
    pub url: String,
}

impl TestServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        Self { listener, url }
    }

    /// Answer one connection per response, in order. The handle yields each
    /// request's head (request line + headers).
    pub fn serve(self, responses: Vec<Canned>) -> JoinHandle<Vec<String>> {
        thread::spawn(move || {
            let mut heads = Vec::new();
            for canned in responses {
                let Ok((mut stream, _)) = self.listener.accept() else {
                    break;
                };
                heads.push(read_request(&mut stream));
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    canned.status,
                    canned.content_type,
                    canned.body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&canned.body);
                let _ = stream.flush();
            }
            heads
        })
    }
}

/// A URL on a port nothing listens on; connecting fails immediately.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// Reads the head and any Content-Length body so closing the socket doesn't reset
// the connection under the client.
fn read_request(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&data).into_owned(),
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
    let body_len = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut have = data.len() - head_end;
    while have < body_len {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => have += n,
        }
    }
    head
}
