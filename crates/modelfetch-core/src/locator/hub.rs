//! Hub repository URL grammar: `<origin>/<repo>/(resolve|blob)/<revision>/<path>`.

use crate::error::FetchError;
use crate::url_model::{flat_file_name, percent_decode};

/// Parsed hub file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubLocation {
    pub repo: String,
    pub revision: String,
    pub remote_path: String,
    pub file_name: String,
    /// Canonical `resolve` URL on the same origin as the input.
    pub download_url: String,
}

/// Splits a hub URL on the first `/resolve/` or `/blob/` separator.
pub fn parse_hub_url(input: &str) -> Result<HubLocation, FetchError> {
    let url = url::Url::parse(input.trim()).map_err(|e| FetchError::malformed(input, e.to_string()))?;
    let path = url.path();

    let sep = ["/resolve/", "/blob/"]
        .iter()
        .filter_map(|s| path.find(s).map(|i| (i, s.len())))
        .min_by_key(|(i, _)| *i)
        .ok_or_else(|| FetchError::malformed(input, "missing /resolve/ or /blob/ segment"))?;

    let repo = path[..sep.0].trim_matches('/');
    if repo.is_empty() {
        return Err(FetchError::malformed(input, "empty repository id"));
    }
    let rest = &path[sep.0 + sep.1..];
    let (revision, remote_path) = rest.split_once('/').unwrap_or((rest, ""));
    if revision.is_empty() {
        return Err(FetchError::malformed(input, "empty revision"));
    }
    let remote_path = remote_path.trim_matches('/');
    if remote_path.is_empty() {
        return Err(FetchError::malformed(input, "empty file path"));
    }

    let file_name = remote_path
        .rsplit('/')
        .next()
        .map(percent_decode)
        .and_then(|s| flat_file_name(&s))
        .ok_or_else(|| FetchError::malformed(input, "no usable file name"))?;

    let download_url = format!(
        "{}/{}/resolve/{}/{}",
        url.origin().ascii_serialization(),
        repo,
        revision,
        remote_path
    );

    Ok(HubLocation {
        repo: percent_decode(repo),
        revision: percent_decode(revision),
        remote_path: percent_decode(remote_path),
        file_name,
        download_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_splits_into_parts() {
        let loc = parse_hub_url("https://hub.example/acme/sd-model/resolve/main/unet/model.safetensors").unwrap();
        assert_eq!(loc.repo, "acme/sd-model");
        assert_eq!(loc.revision, "main");
        assert_eq!(loc.remote_path, "unet/model.safetensors");
        assert_eq!(loc.file_name, "model.safetensors");
        assert_eq!(
            loc.download_url,
            "https://hub.example/acme/sd-model/resolve/main/unet/model.safetensors"
        );
    }

    #[test]
    fn blob_is_rewritten_to_resolve() {
        let loc = parse_hub_url("https://hub.example/acme/sd-model/blob/main/unet/model.safetensors").unwrap();
        assert_eq!(loc.remote_path, "unet/model.safetensors");
        assert_eq!(
            loc.download_url,
            "https://hub.example/acme/sd-model/resolve/main/unet/model.safetensors"
        );
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        let loc = parse_hub_url("https://hub.example/a/b/resolve/v1.0/w.bin?download=true#x").unwrap();
        assert_eq!(loc.revision, "v1.0");
        assert_eq!(loc.remote_path, "w.bin");
        assert_eq!(loc.download_url, "https://hub.example/a/b/resolve/v1.0/w.bin");
    }

    #[test]
    fn origin_keeps_port() {
        let loc = parse_hub_url("http://127.0.0.1:8080/a/b/resolve/main/f.bin").unwrap();
        assert_eq!(loc.download_url, "http://127.0.0.1:8080/a/b/resolve/main/f.bin");
    }

    #[test]
    fn first_separator_wins() {
        let loc = parse_hub_url("https://hub.example/a/b/resolve/main/blob/x.bin").unwrap();
        assert_eq!(loc.revision, "main");
        assert_eq!(loc.remote_path, "blob/x.bin");
    }

    #[test]
    fn malformed_inputs() {
        for bad in [
            "https://hub.example/acme/sd-model",
            "https://hub.example/resolve/main/x.bin",
            "https://hub.example/a/b/resolve//x.bin",
            "https://hub.example/a/b/resolve/main",
            "https://hub.example/a/b/resolve/main/",
            "not a url",
        ] {
            let err = parse_hub_url(bad).unwrap_err();
            assert_eq!(err.kind(), "malformed_url", "{bad}");
        }
    }
}
