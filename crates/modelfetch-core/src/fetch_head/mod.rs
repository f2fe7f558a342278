//! HTTP HEAD probing and small metadata GETs.
//!
//! Uses libcurl to learn size, range support and the advertised file name
//! before a transfer, and to fetch small JSON documents from metadata APIs.

mod body;
mod parse;

pub use body::get_body;
pub(crate) use parse::parse_headers;

use std::collections::HashMap;
use std::str;
use std::time::Duration;

use crate::retry::TransferError;

/// Key headers from a HEAD request.
#[derive(Debug, Clone, Default)]
pub struct HeadResult {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
    /// `Content-Disposition` value if present (file name hint).
    pub content_disposition: Option<String>,
}

/// Builds a curl header list from `Name: value` pairs.
pub(crate) fn header_list(headers: &HashMap<String, String>) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    Ok(list)
}

/// Performs a HEAD request (following redirects) and returns parsed metadata.
/// Blocking; call from `spawn_blocking` when used from async code.
pub fn probe(url: &str, headers: &HashMap<String, String>) -> Result<HeadResult, TransferError> {
    let mut lines: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(30))?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                // A new status line starts a new response (redirect hop); keep only the last.
                if line.starts_with("HTTP/") {
                    lines.clear();
                }
                lines.push(line.to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }

    Ok(parse_headers(&lines))
}
