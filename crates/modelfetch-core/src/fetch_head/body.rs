//! Small in-memory GET, used for metadata endpoints.

use std::collections::HashMap;
use std::time::Duration;

use super::header_list;
use crate::retry::TransferError;

/// Upper bound on metadata responses kept in memory.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// GETs `url` and returns the body. Fails on non-2xx or oversized bodies.
pub fn get_body(url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, TransferError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if body.len() + data.len() > MAX_BODY_BYTES {
                return Ok(0); // abort transfer
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }
    Ok(body)
}
