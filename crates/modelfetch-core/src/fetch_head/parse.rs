//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut head = HeadResult::default();

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            head.content_length = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("accept-ranges") {
            head.accept_ranges = value.eq_ignore_ascii_case("bytes");
        } else if name.eq_ignore_ascii_case("content-disposition") {
            head.content_disposition = Some(value.to_string());
        }
    }

    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn length_and_ranges() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "Accept-Ranges: bytes",
        ]));
        assert_eq!(r.content_length, Some(12345));
        assert!(r.accept_ranges);
        assert!(r.content_disposition.is_none());
    }

    #[test]
    fn no_ranges() {
        let r = parse_headers(&lines(&["content-length: 9", "accept-ranges: none"]));
        assert_eq!(r.content_length, Some(9));
        assert!(!r.accept_ranges);
    }

    #[test]
    fn disposition_kept_raw() {
        let r = parse_headers(&lines(&[
            "Content-Disposition: attachment; filename=\"lora.safetensors\"",
        ]));
        assert_eq!(
            r.content_disposition.as_deref(),
            Some("attachment; filename=\"lora.safetensors\"")
        );
    }
}
