//! Single-range GET written into the staged file at the segment offset.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::CurlOptions;
use crate::fetch_head::header_list;
use crate::retry::TransferError;
use crate::segmenter::Segment;
use crate::storage::StagedFile;

/// Downloads `segment` with a Range GET. Errors are returned unconverted so
/// the caller can classify them for retry.
pub(super) fn download_one_segment(
    url: &str,
    headers: &HashMap<String, String>,
    segment: &Segment,
    storage: &StagedFile,
    curl: CurlOptions,
) -> Result<(), TransferError> {
    let mut written = 0u64;
    let storage_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));
    let storage_error_cb = Arc::clone(&storage_error);
    let start = segment.start;
    let limit = segment.len();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    curl.apply(&mut easy)?;
    easy.range(&segment.curl_range())?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            // A server that ignores Range would overrun the segment; stop it.
            if written + data.len() as u64 > limit {
                return Ok(0);
            }
            match storage.write_at(start + written, data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    if let Ok(mut slot) = storage_error_cb.lock() {
                        *slot = Some(e);
                    }
                    Ok(0)
                }
            }
        })?;
        if let Err(e) = transfer.perform() {
            if e.is_write_error() {
                if let Some(io_err) = storage_error.lock().ok().and_then(|mut s| s.take()) {
                    return Err(TransferError::Storage(io_err));
                }
            }
            return Err(TransferError::Curl(e));
        }
    }

    let code = easy.response_code()?;
    if code != 206 && !(code == 200 && segment.start == 0 && written == limit) {
        return Err(TransferError::Http(code));
    }
    if written != limit {
        return Err(TransferError::PartialTransfer {
            expected: limit,
            received: written,
        });
    }
    Ok(())
}
