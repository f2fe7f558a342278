//! Platform routing: classify a URL into one of a closed set of source kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host fragments that identify the model hub.
pub const DEFAULT_HUB_HOSTS: &[&str] = &["huggingface.co", "hf.co"];
/// Host fragments that identify the community model site.
pub const DEFAULT_COMMUNITY_HOSTS: &[&str] = &["civitai.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    /// Versioned `owner/repo` storage addressed by resolve/blob URLs.
    HubRepository,
    /// Opaque download ids; needs name discovery and token auth.
    CommunitySite,
    /// Any other direct download URL.
    Generic,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::HubRepository => "hub",
            Platform::CommunitySite => "community",
            Platform::Generic => "generic",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive host-fragment router. Hub fragments are checked before
/// community fragments; anything unmatched is `Generic`.
#[derive(Debug, Clone)]
pub struct PlatformRouter {
    hub: Vec<String>,
    community: Vec<String>,
}

impl Default for PlatformRouter {
    fn default() -> Self {
        let own = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            hub: own(DEFAULT_HUB_HOSTS),
            community: own(DEFAULT_COMMUNITY_HOSTS),
        }
    }
}

impl PlatformRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends extra fragments (mirrors, self-hosted instances) to the built-in lists.
    pub fn with_extra_hosts(mut self, hub: &[String], community: &[String]) -> Self {
        let clean = |s: &String| {
            let s = s.trim().to_ascii_lowercase();
            (!s.is_empty()).then_some(s)
        };
        self.hub.extend(hub.iter().filter_map(clean));
        self.community.extend(community.iter().filter_map(clean));
        self
    }

    /// Classifies `url`. Matches against `host[:port]`, or the whole input when
    /// it has no parseable host. Never fails.
    pub fn detect(&self, url: &str) -> Platform {
        let haystack = authority(url).unwrap_or_else(|| url.to_ascii_lowercase());
        let hit = |fragments: &[String]| fragments.iter().any(|f| haystack.contains(f.as_str()));
        if hit(&self.hub) {
            Platform::HubRepository
        } else if hit(&self.community) {
            Platform::CommunitySite
        } else {
            Platform::Generic
        }
    }
}

fn authority(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
