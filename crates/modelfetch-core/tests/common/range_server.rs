//! Threaded HTTP/1.1 test server with HEAD and byte-range support.
//!
//! Every path serves the same body, so hub, community and generic URL shapes
//! can all point at one instance.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Ignore `Range` and always answer 200 with the full body.
    pub no_ranges: bool,
    /// `Content-Disposition` value sent on HEAD and GET.
    pub content_disposition: Option<String>,
    /// Advertise the full length but close after this many body bytes.
    pub truncate_at: Option<usize>,
}

pub struct RangeServer {
    /// Base URL with trailing slash, e.g. `http://127.0.0.1:40000/`.
    pub base: String,
    /// `host:port`, usable as a routing fragment.
    pub authority: String,
    gets: Arc<AtomicUsize>,
}

impl RangeServer {
    pub fn start(body: Vec<u8>) -> Self {
        Self::start_with(body, ServerOptions::default())
    }

    pub fn start_with(body: Vec<u8>, opts: ServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let body = Arc::new(body);
        let opts = Arc::new(opts);
        let gets = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&gets);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let body = Arc::clone(&body);
                let opts = Arc::clone(&opts);
                let counter = Arc::clone(&counter);
                thread::spawn(move || serve(stream, &body, &opts, &counter));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}/", port),
            authority: format!("127.0.0.1:{}", port),
            gets,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Number of GET requests answered so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

fn serve(mut stream: TcpStream, body: &[u8], opts: &ServerOptions, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (method, range) = parse_request(request);
    let total = body.len() as u64;

    let mut extra = String::from("Connection: close\r\n");
    if !opts.no_ranges {
        extra.push_str("Accept-Ranges: bytes\r\n");
    }
    if let Some(cd) = &opts.content_disposition {
        extra.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }

    match method.to_ascii_uppercase().as_str() {
        "HEAD" => {
            let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n", total, extra);
            let _ = stream.write_all(head.as_bytes());
        }
        "GET" => {
            gets.fetch_add(1, Ordering::SeqCst);
            let (status, slice) = match range.filter(|_| !opts.no_ranges) {
                Some((start, _)) if start >= total => {
                    let head = format!(
                        "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\n{}\r\n",
                        total, extra
                    );
                    let _ = stream.write_all(head.as_bytes());
                    return;
                }
                Some((start, end_incl)) => {
                    let end_excl = end_incl.saturating_add(1).min(total);
                    extra.push_str(&format!("Content-Range: bytes {}-{}/{}\r\n", start, end_excl - 1, total));
                    ("206 Partial Content", &body[start as usize..end_excl as usize])
                }
                None => ("200 OK", body),
            };
            let head = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\n{}\r\n", status, slice.len(), extra);
            let _ = stream.write_all(head.as_bytes());
            let sent = opts.truncate_at.map_or(slice.len(), |cut| cut.min(slice.len()));
            let _ = stream.write_all(&slice[..sent]);
        }
        _ => {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        }
    }
}

/// Method and optional `bytes=start-end` range (open end → `u64::MAX`).
fn parse_request(request: &str) -> (String, Option<(u64, u64)>) {
    let mut lines = request.lines();
    let method = lines
        .next()
        .and_then(|l| l.split_whitespace().next())
        .unwrap_or("")
        .to_string();
    let range = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("range"))
        .and_then(|(_, value)| {
            let span = value.trim().strip_prefix("bytes=")?;
            let (a, b) = span.split_once('-')?;
            let start = a.trim().parse().ok()?;
            let end = match b.trim() {
                "" => u64::MAX,
                e => e.parse().ok()?,
            };
            Some((start, end))
        });
    (method, range)
}
