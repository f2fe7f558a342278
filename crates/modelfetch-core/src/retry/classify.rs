//! Maps transfer failures onto retry kinds.

use super::error::TransferError;
use super::policy::ErrorKind;

/// Status codes worth another connection. Everything else in 4xx is final:
/// a missing file or a bad token does not change on retry.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        408 => ErrorKind::Timeout,
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    let dropped = e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_http2_error()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file();
    match (e.is_operation_timedout(), dropped) {
        (true, _) => ErrorKind::Timeout,
        (false, true) => ErrorKind::Connection,
        (false, false) => ErrorKind::Other,
    }
}

pub fn classify(e: &TransferError) -> ErrorKind {
    match e {
        TransferError::Curl(ce) => classify_curl_error(ce),
        TransferError::Http(code) => classify_http_status(*code),
        TransferError::PartialTransfer { .. } => ErrorKind::Connection,
        // Disk full or permission problems persist across attempts.
        TransferError::Storage(_) => ErrorKind::Other,
    }
}
