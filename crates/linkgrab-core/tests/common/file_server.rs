//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes (status + body, optional redirect, optional
//! truncated or stalled body) and records every request as `(method, path)` so tests
//! can assert which items actually hit the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Sent as `Location` (use with a 3xx status).
    pub location: Option<String>,
    /// Announce the full length but close after half the body.
    pub truncate: bool,
    /// Hold the connection open this long before closing. For GET this
    /// happens after half the body, for HEAD before any response.
    pub stall: Option<Duration>,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            location: None,
            truncate: false,
            stall: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error page".to_vec(),
            location: None,
            truncate: false,
            stall: None,
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            location: Some(to.to_string()),
            truncate: false,
            stall: None,
        }
    }

    pub fn truncated(body: impl Into<Vec<u8>>) -> Self {
        Self {
            truncate: true,
            ..Self::ok(body)
        }
    }

    /// Sends half of `body`, then goes silent for `stall`.
    pub fn stalled(body: impl Into<Vec<u8>>, stall: Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::truncated(body)
        }
    }
}

pub struct TestServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub base_url: String,
    hits: Arc<Mutex<Vec<(String, String)>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests seen for `path` (any method).
    pub fn hits_for(&self, path: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|(_, p)| p == path).count()
    }

    /// Requests seen with `method`.
    pub fn hits_with_method(&self, method: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

/// Starts a server in a background thread. Unknown paths answer 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// A port nothing listens on (connection refused).
pub fn dead_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, path)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<(String, String)>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("/").to_string();
    hits.lock().unwrap().push((method.clone(), path.clone()));

    let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
    let reason = match route.status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        _ => "Other",
    };
    let location = route
        .location
        .as_ref()
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        route.status,
        reason,
        route.body.len(),
        location
    );
    if method.eq_ignore_ascii_case("HEAD") {
        if let Some(stall) = route.stall {
            thread::sleep(stall);
        }
        let _ = stream.write_all(head.as_bytes());
        return;
    }
    let _ = stream.write_all(head.as_bytes());
    let body = if route.truncate {
        &route.body[..route.body.len() / 2]
    } else {
        &route.body[..]
    };
    let _ = stream.write_all(body);
    if let Some(stall) = route.stall {
        thread::sleep(stall);
    }
}
