//! `modelfetch fetch`: single URL or batch download.

use anyhow::{bail, Result};
use modelfetch_core::config::FetchConfig;
use modelfetch_core::scheduler::Interrupt;
use modelfetch_core::Orchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::batch_file::load_batch;

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub urls: Vec<String>,
    pub batch: Option<PathBuf>,
    pub dir: String,
    pub jobs: Option<usize>,
}

/// Collects `(url, destination)` pairs from `--url` and the batch file,
/// resolving preset keys and relative paths against `cwd`.
pub fn collect_pairs(cfg: &FetchConfig, args: &FetchArgs, cwd: &Path) -> Result<Vec<(String, PathBuf)>> {
    let default_dest = cfg.resolve_destination(&args.dir, cwd);
    let mut pairs: Vec<(String, PathBuf)> = args
        .urls
        .iter()
        .map(|u| (u.trim().to_string(), default_dest.clone()))
        .filter(|(u, _)| !u.is_empty())
        .collect();
    if let Some(path) = &args.batch {
        for entry in load_batch(path)? {
            let dest = match &entry.dir {
                Some(dir) => cfg.resolve_destination(dir, cwd),
                None => default_dest.clone(),
            };
            pairs.push((entry.url, dest));
        }
    }
    Ok(pairs)
}

pub async fn run_fetch(cfg: &FetchConfig, args: FetchArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let pairs = collect_pairs(cfg, &args, &cwd)?;
    if pairs.is_empty() {
        bail!("nothing to fetch: give --url or --batch");
    }

    let orch = Arc::new(Orchestrator::new(cfg));

    if let [(url, dest)] = pairs.as_slice() {
        let ok = orch.fetch_one(url, dest.clone()).await;
        println!("{}: {}", if ok { "ok" } else { "failed" }, url);
        if !ok {
            bail!("download failed (see log for details)");
        }
        return Ok(());
    }

    let interrupt = Arc::new(Interrupt::new());
    let watcher = {
        let interrupt = Arc::clone(&interrupt);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("interrupt received, finishing in-flight downloads");
                interrupt.request();
            }
        })
    };

    let report = orch.run_batch(pairs, args.jobs, Some(interrupt)).await;
    watcher.abort();

    print!("{}", report);
    if report.has_failures() {
        bail!("{} of {} download(s) failed", report.failed(), report.total());
    }
    Ok(())
}
