//! Resource locator: turns a routed URL into a [`ResourceDescriptor`].
//!
//! Hub URLs are parsed strictly; community URLs go through a best-effort name
//! chain backed by a [`NameProbe`]; generic URLs use the last path segment.

pub mod auth;
pub mod community;
pub mod hub;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::TokensConfig;
use crate::error::FetchError;
use crate::fetch_head;
use crate::platform::Platform;
use crate::url_model::{filename_from_content_disposition, generic_file_name};

/// Resolved identity of one remote file. Built once per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub platform: Platform,
    /// `owner/repo` on the hub, the numeric model id on the community site.
    pub repo_or_collection_id: Option<String>,
    pub revision: Option<String>,
    pub remote_path: Option<String>,
    /// Flat, sanitized name placed in the destination.
    pub file_name: String,
    /// URL handed to the transport (canonical hub URL, tokenized community URL).
    pub download_url: String,
}

/// Network lookups used for community name discovery. Both are best effort.
pub trait NameProbe: Send + Sync {
    /// File name advertised by the server in `Content-Disposition`.
    fn advertised_name(&self, url: &str, headers: &HashMap<String, String>) -> Option<String>;
    /// File name from the community metadata endpoint.
    fn metadata_name(&self, api_url: &str, headers: &HashMap<String, String>) -> Option<String>;
}

/// [`NameProbe`] over libcurl: HEAD probe and a JSON GET.
#[derive(Debug, Default)]
pub struct CurlProbe;

impl NameProbe for CurlProbe {
    fn advertised_name(&self, url: &str, headers: &HashMap<String, String>) -> Option<String> {
        match fetch_head::probe(url, headers) {
            Ok(head) => head
                .content_disposition
                .as_deref()
                .and_then(filename_from_content_disposition),
            Err(e) => {
                tracing::debug!(%url, error = %e, "HEAD probe failed");
                None
            }
        }
    }

    fn metadata_name(&self, api_url: &str, headers: &HashMap<String, String>) -> Option<String> {
        match fetch_head::get_body(api_url, headers) {
            Ok(body) => community::name_from_metadata(&body),
            Err(e) => {
                tracing::debug!(url = %api_url, error = %e, "metadata query failed");
                None
            }
        }
    }
}

pub struct ResourceLocator {
    probe: Arc<dyn NameProbe>,
    tokens: TokensConfig,
}

impl ResourceLocator {
    pub fn new(probe: Arc<dyn NameProbe>, tokens: TokensConfig) -> Self {
        Self { probe, tokens }
    }

    pub fn with_curl(tokens: TokensConfig) -> Self {
        Self::new(Arc::new(CurlProbe), tokens)
    }

    /// Request headers for transfers on `platform`. Only the hub uses a
    /// header credential; the community token travels in the query.
    pub fn headers_for(&self, platform: Platform) -> HashMap<String, String> {
        match platform {
            Platform::HubRepository => auth::bearer_headers(self.tokens.hub.as_deref()),
            Platform::CommunitySite | Platform::Generic => HashMap::new(),
        }
    }

    pub fn locate(&self, url: &str, platform: Platform) -> Result<ResourceDescriptor, FetchError> {
        let url = url.trim();
        match platform {
            Platform::HubRepository => {
                let loc = hub::parse_hub_url(url)?;
                Ok(ResourceDescriptor {
                    platform,
                    repo_or_collection_id: Some(loc.repo),
                    revision: Some(loc.revision),
                    remote_path: Some(loc.remote_path),
                    file_name: loc.file_name,
                    download_url: loc.download_url,
                })
            }
            Platform::CommunitySite => {
                let token = self.tokens.community.as_deref();
                let prepared = auth::attach_query_token(url, token);
                let file_name = community::resolve_name(
                    self.probe.as_ref(),
                    &prepared,
                    url,
                    &auth::bearer_headers(token),
                );
                Ok(ResourceDescriptor {
                    platform,
                    repo_or_collection_id: community::model_id(url),
                    revision: None,
                    remote_path: None,
                    file_name,
                    download_url: prepared,
                })
            }
            Platform::Generic => {
                url::Url::parse(url).map_err(|e| FetchError::malformed(url, e.to_string()))?;
                Ok(ResourceDescriptor {
                    platform,
                    repo_or_collection_id: None,
                    revision: None,
                    remote_path: None,
                    file_name: generic_file_name(url),
                    download_url: url.to_string(),
                })
            }
        }
    }
}
