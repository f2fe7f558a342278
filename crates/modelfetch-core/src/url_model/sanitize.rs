//! Linux-safe file name sanitization.

const NAME_MAX: usize = 255;

fn is_unsafe(c: char) -> bool {
    matches!(c, '\0' | '/' | '\\' | ' ' | '\t') || c.is_control()
}

/// Replaces separators, whitespace and control characters with `_` (runs
/// collapsed), trims dots, spaces and underscores at both ends, and caps the
/// result at 255 bytes on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_unsafe(c) {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
