//! Last path segment of a URL.

/// Returns the last non-empty path segment of `url`, without query or fragment.
/// The segment is returned still percent-encoded.
///
/// Falls back to plain string splitting when the URL does not parse.
pub fn last_path_segment(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url.trim()) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
        Err(_) => {
            let without_query = url.split(['?', '#']).next().unwrap_or("");
            without_query
                .split('/')
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)
        }
    }?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}
