//! CLI for the modelfetch artifact downloader.

mod batch_file;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modelfetch_core::config;
use std::path::PathBuf;

use commands::{run_detect, run_fetch, run_presets, FetchArgs};

/// Top-level CLI for modelfetch.
#[derive(Debug, Parser)]
#[command(name = "modelfetch")]
#[command(about = "Fetch model artifacts from hubs, community sites and direct URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one or more URLs into a directory or preset.
    Fetch {
        /// URL to download (repeatable).
        #[arg(long = "url", short = 'u', value_name = "URL")]
        urls: Vec<String>,

        /// File with one URL per line, optionally followed by a directory.
        #[arg(long, short = 'b', value_name = "FILE")]
        batch: Option<PathBuf>,

        /// Preset key (see `presets`) or directory path.
        #[arg(long, short = 'd', default_value = ".", value_name = "DIR")]
        dir: String,

        /// Parallel downloads (default from config).
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,
    },

    /// List preset destination directories.
    Presets,

    /// Show platform and resolved file name for a URL without downloading.
    Detect {
        url: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cfg.tokens.fill_from(|key| std::env::var(key).ok());
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                urls,
                batch,
                dir,
                jobs,
            } => {
                let args = FetchArgs {
                    urls,
                    batch,
                    dir,
                    jobs,
                };
                run_fetch(&cfg, args).await?
            }
            CliCommand::Presets => run_presets(&cfg),
            CliCommand::Detect { url } => run_detect(&cfg, &url).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
