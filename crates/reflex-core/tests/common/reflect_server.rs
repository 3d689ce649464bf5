//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/cdx`   archive index stand-in: the configured listing, one URL per line
//!   (paths are prefixed with the server base), or 500 when `archive_fails`.
//! - `/echo`  reflects decoded query values verbatim.
//! - `/safe`  reflects query values HTML-escaped.
//! - `/fail`  always 500.
//! - anything else: 404.
//!
//! Every request path is recorded so tests can assert how often a route was hit.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Paths (with query) listed by `/cdx`, e.g. `/echo?id=1`.
    pub listing: Vec<String>,
    /// If true, `/cdx` answers 500.
    pub archive_fails: bool,
}

pub struct TestServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests whose path (without query) equals `path`.
    pub fn hits_for(&self, path: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.split('?').next() == Some(path))
            .count()
    }

    /// Number of requests for exactly `path_and_query`.
    pub fn hits_exact(&self, path_and_query: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path_and_query)
            .count()
    }
}

/// Starts the server on an ephemeral port. It runs until the process exits.
pub fn start(opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);
    let hits = Arc::new(Mutex::new(Vec::new()));
    let opts = Arc::new(opts);
    {
        let base = base.clone();
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let base = base.clone();
                let hits = Arc::clone(&hits);
                let opts = Arc::clone(&opts);
                thread::spawn(move || handle(stream, &base, &opts, &hits));
            }
        });
    }
    TestServer { base, hits }
}

fn handle(
    mut stream: std::net::TcpStream,
    base: &str,
    opts: &ServerOptions,
    hits: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(target.clone());

    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target.as_str(), ""),
    };
    let values = || -> Vec<String> {
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(_, v)| v.into_owned())
            .collect()
    };

    let (status, body) = match path {
        "/cdx" if opts.archive_fails => ("500 Internal Server Error", "index unavailable".to_string()),
        "/cdx" => (
            "200 OK",
            opts.listing
                .iter()
                .map(|p| format!("{}{}\n", base, p))
                .collect::<String>(),
        ),
        "/echo" => (
            "200 OK",
            format!("<html><body>{}</body></html>", values().join(" ")),
        ),
        "/safe" => (
            "200 OK",
            format!(
                "<html><body>{}</body></html>",
                values()
                    .join(" ")
                    .replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('>', "&gt;")
            ),
        ),
        "/fail" => ("500 Internal Server Error", "boom".to_string()),
        _ => ("404 Not Found", "not found".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}
