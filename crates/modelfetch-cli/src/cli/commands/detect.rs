//! `modelfetch detect`: route and locate a URL without downloading.

use anyhow::{Context, Result};
use modelfetch_core::config::FetchConfig;
use modelfetch_core::Orchestrator;
use std::sync::Arc;

pub async fn run_detect(cfg: &FetchConfig, url: &str) -> Result<()> {
    let orch = Arc::new(Orchestrator::new(cfg));
    let url = url.to_string();
    let descriptor = tokio::task::spawn_blocking(move || orch.describe(&url))
        .await
        .context("detect worker")??;

    println!("platform:   {}", descriptor.platform);
    if let Some(repo) = &descriptor.repo_or_collection_id {
        println!("id:         {}", repo);
    }
    if let Some(rev) = &descriptor.revision {
        println!("revision:   {}", rev);
    }
    if let Some(path) = &descriptor.remote_path {
        println!("path:       {}", path);
    }
    println!("file name:  {}", descriptor.file_name);
    Ok(())
}
