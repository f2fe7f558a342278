use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per connection (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Extra host fragments per platform, appended to the built-in lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostsConfig {
    #[serde(default)]
    pub hub: Vec<String>,
    #[serde(default)]
    pub community: Vec<String>,
}

/// Per-platform credentials. Resolved by the caller (config file or environment);
/// the core never reads the environment itself.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TokensConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
}

impl std::fmt::Debug for TokensConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |t: &Option<String>| t.as_ref().map(|_| "<set>");
        f.debug_struct("TokensConfig")
            .field("hub", &mask(&self.hub))
            .field("community", &mask(&self.community))
            .finish()
    }
}

impl TokensConfig {
    /// Fill unset tokens from `HF_TOKEN` / `CIVITAI_TOKEN`-style lookups.
    /// Takes the lookup as a closure so the core stays free of process-wide state.
    pub fn fill_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        if self.hub.is_none() {
            self.hub = non_empty(lookup(HUB_TOKEN_ENV));
        }
        if self.community.is_none() {
            self.community = non_empty(lookup(COMMUNITY_TOKEN_ENV));
        }
    }
}

/// Environment variable consulted for the hub token.
pub const HUB_TOKEN_ENV: &str = "HF_TOKEN";
/// Environment variable consulted for the community site token.
pub const COMMUNITY_TOKEN_ENV: &str = "CIVITAI_TOKEN";

/// Built-in preset directories (key → path).
pub fn default_presets() -> BTreeMap<String, PathBuf> {
    [
        ("diffusion", "/root/ComfyUI/models/diffusion_models"),
        ("vae", "/root/ComfyUI/models/vae"),
        ("text_encoder", "/root/ComfyUI/models/text_encoders"),
        ("lora", "/root/ComfyUI/models/loras"),
        ("checkpoint", "/root/ComfyUI/models/checkpoints"),
        ("clip", "/root/ComfyUI/models/clip"),
        ("clip_vision", "/root/ComfyUI/models/clip_vision"),
        ("unet", "/root/ComfyUI/models/unet"),
        ("controlnet", "/root/ComfyUI/models/controlnet"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
    .collect()
}

fn default_staging_dir_name() -> String {
    ".temp_download".to_string()
}

/// Global configuration loaded from `~/.config/modelfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Worker count used when `--jobs` is not given.
    pub jobs: usize,
    /// Connections per segmented transfer.
    pub segments_per_file: usize,
    /// Maximum total concurrent HTTP connections across all workers.
    pub max_total_connections: usize,
    /// Optional receive cap in bytes per second, applied per connection.
    #[serde(default)]
    pub max_bytes_per_sec: Option<u64>,
    /// Name of the staging directory created inside each destination.
    #[serde(default = "default_staging_dir_name")]
    pub staging_dir_name: String,
    /// Preset key → destination directory.
    #[serde(default = "default_presets")]
    pub presets: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub hosts: HostsConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub tokens: TokensConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            segments_per_file: 8,
            max_total_connections: 32,
            max_bytes_per_sec: None,
            staging_dir_name: default_staging_dir_name(),
            presets: default_presets(),
            hosts: HostsConfig::default(),
            retry: None,
            tokens: TokensConfig::default(),
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    /// Resolves a `--dir` value: a preset key, or a literal path made absolute
    /// against `cwd`.
    pub fn resolve_destination(&self, dir: &str, cwd: &Path) -> PathBuf {
        if let Some(preset) = self.presets.get(dir) {
            return preset.clone();
        }
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
