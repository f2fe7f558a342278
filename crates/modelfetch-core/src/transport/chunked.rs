//! Resumable sequential pull.
//!
//! Streams the body into the staged file chunk by chunk. A retry reopens the
//! connection with `Range: bytes=<written>-` so completed bytes are kept; if
//! the server ignores the range and answers 200, the file restarts from zero.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use super::CurlOptions;
use crate::fetch_head::header_list;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};

/// Pulls `url` into `staged_path`, resuming across retries. Returns the final size.
pub fn download_chunked(
    url: &str,
    headers: &HashMap<String, String>,
    staged_path: &Path,
    policy: &RetryPolicy,
    curl: CurlOptions,
) -> Result<u64, TransferError> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(staged_path)?;
    let total = run_with_retry(policy, |attempt| {
        let res = pull_once(url, headers, &mut file, curl);
        if let Err(ref e) = res {
            tracing::debug!(url, attempt, error = %e, "chunked pull attempt failed");
        }
        res
    })?;
    file.sync_all()?;
    Ok(total)
}

/// One connection: continue from the current file length.
fn pull_once(
    url: &str,
    headers: &HashMap<String, String>,
    file: &mut File,
    curl: CurlOptions,
) -> Result<u64, TransferError> {
    let offset = file.metadata()?.len();
    file.seek(SeekFrom::Start(offset))?;

    let status: Cell<Option<u32>> = Cell::new(None);
    let body_len: Cell<Option<u64>> = Cell::new(None);
    let mut base = offset;
    let mut written = 0u64;
    let mut checked = false;
    let mut io_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    curl.apply(&mut easy)?;
    if offset > 0 {
        easy.range(&format!("{}-", offset))?;
    }
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = std::str::from_utf8(data) {
                let line = line.trim_end();
                if line.starts_with("HTTP/") {
                    status.set(line.split_whitespace().nth(1).and_then(|c| c.parse().ok()));
                    body_len.set(None);
                } else if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        body_len.set(value.trim().parse().ok());
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if !status.get().is_some_and(|c| (200..300).contains(&c)) {
                // Error page body; the status check below reports it.
                return Ok(data.len());
            }
            if !checked {
                checked = true;
                if base > 0 && status.get() == Some(200) {
                    // Range ignored: the body is the whole file again.
                    if let Err(e) = file.set_len(0) {
                        io_error = Some(e);
                        return Ok(0);
                    }
                    if let Err(e) = file.seek(SeekFrom::Start(0)) {
                        io_error = Some(e);
                        return Ok(0);
                    }
                    base = 0;
                }
            }
            match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    io_error = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(io) = io_error {
                return Err(TransferError::Storage(io));
            }
        }
        return Err(TransferError::Curl(e));
    }

    let code = easy.response_code()?;
    if code == 416 && offset > 0 {
        // Nothing left to send: the previous attempt already had every byte.
        return Ok(offset);
    }
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }
    if let Some(expected) = body_len.get() {
        if written < expected {
            return Err(TransferError::PartialTransfer {
                expected,
                received: written,
            });
        }
    }
    file.flush()?;
    Ok(base + written)
}
