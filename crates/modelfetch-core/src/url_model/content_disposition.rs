//! `Content-Disposition` filename extraction (`filename` and RFC 5987 `filename*`).

/// Extracts the advertised file name from a raw header value.
/// `filename*` wins over `filename` when both are present.
pub fn filename_from_content_disposition(header_value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(header_value) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim();
        match key.as_str() {
            "filename*" => {
                // charset'language'value
                let mut parts = raw.splitn(3, '\'');
                let (charset, _lang, value) = (parts.next(), parts.next(), parts.next());
                if let (Some(charset), Some(value)) = (charset, value) {
                    if charset.eq_ignore_ascii_case("utf-8") {
                        extended = Some(percent_decode(unquote(value).as_str()));
                    }
                }
            }
            "filename" => plain = Some(unquote(raw)),
            _ => {}
        }
    }

    extended.or(plain).filter(|s| !s.trim().is_empty())
}

/// Splits on `;` outside of double quotes.
fn split_params(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&value[start..]);
    out
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Percent-decodes `input`; malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
