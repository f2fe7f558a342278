//! Batch file format: `URL [DIR]` per line, `#` comments and blank lines skipped.

use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub url: String,
    /// Per-line destination (preset key or path); `--dir` applies when absent.
    pub dir: Option<String>,
}

pub fn parse_batch(text: &str) -> Vec<BatchEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let url = parts.next()?.to_string();
            let dir = parts.next().map(str::to_string);
            Some(BatchEntry { url, dir })
        })
        .collect()
}

pub fn load_batch(path: &Path) -> Result<Vec<BatchEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read batch file {}", path.display()))?;
    Ok(parse_batch(&text))
}
