//! Community site name discovery.
//!
//! Download links on the community site are opaque ids, so the file name is
//! discovered with a best-effort chain that never fails the task.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use super::NameProbe;
use crate::url_model::{flat_file_name, last_path_segment, percent_decode};

#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(rename = "modelVersions", default)]
    model_versions: Vec<ModelVersion>,
}

#[derive(Debug, Deserialize)]
struct ModelVersion {
    #[serde(default)]
    files: Vec<ModelFile>,
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    name: Option<String>,
}

/// `modelVersions[0].files[0].name` from a metadata response body.
pub fn name_from_metadata(body: &[u8]) -> Option<String> {
    let info: ModelInfo = serde_json::from_slice(body).ok()?;
    info.model_versions
        .into_iter()
        .next()?
        .files
        .into_iter()
        .next()?
        .name
}

/// Numeric id following a `models` path segment.
pub fn model_id(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    while let Some(seg) = segments.next() {
        if seg == "models" {
            let id = segments.next()?;
            return (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then(|| id.to_string());
        }
    }
    None
}

/// Metadata endpoint on the same host as the download URL.
pub fn metadata_url(url: &str, id: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let authority = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Some(format!("{}://{}/api/v1/models/{}", parsed.scheme(), authority, id))
}

/// Runs the name chain: advertised name, metadata name, last path segment,
/// timestamped fallback. Each candidate is flattened and sanitized.
pub fn resolve_name(
    probe: &dyn NameProbe,
    prepared_url: &str,
    original_url: &str,
    metadata_headers: &HashMap<String, String>,
) -> String {
    if let Some(name) = probe
        .advertised_name(prepared_url, &HashMap::new())
        .and_then(|n| flat_file_name(&n))
    {
        return name;
    }

    if let Some(api) = model_id(original_url).and_then(|id| metadata_url(original_url, &id)) {
        if let Some(name) = probe
            .metadata_name(&api, metadata_headers)
            .and_then(|n| flat_file_name(&n))
        {
            return name;
        }
    }

    if let Some(name) = last_path_segment(original_url)
        .map(|s| percent_decode(&s))
        .and_then(|s| flat_file_name(&s))
    {
        return name;
    }

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("model_{}.safetensors", ts)
}
