//! File-name derivation for downloads.
//!
//! Every name placed in a destination is flat: directory components from
//! remote paths or headers are dropped and the result is sanitized for Linux.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::{filename_from_content_disposition, percent_decode};
pub use path::last_path_segment;
pub use sanitize::sanitize_file_name;

/// Name used when nothing usable can be derived from a generic URL.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Turns a raw candidate into a flat, safe file name. `None` if nothing usable remains.
pub fn flat_file_name(candidate: &str) -> Option<String> {
    let base = candidate
        .rsplit(['/', '\\'])
        .find(|s| !s.trim().is_empty())?;
    let name = sanitize_file_name(base);
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

/// Name for a generic direct URL: last path segment without query, or
/// [`DEFAULT_FILENAME`].
pub fn generic_file_name(url: &str) -> String {
    last_path_segment(url)
        .map(|s| percent_decode(&s))
        .and_then(|s| flat_file_name(&s))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
