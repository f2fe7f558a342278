//! Outcome aggregation: a pure fold over fetch outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::platform::Platform;
use crate::task::{FetchOutcome, FetchStatus};

/// Status counts for one partition (or the whole batch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Tally {
    fn add(&mut self, status: FetchStatus) {
        match status {
            FetchStatus::Completed => self.completed += 1,
            FetchStatus::Skipped => self.skipped += 1,
            FetchStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed
    }

    /// Share of tasks whose file is present afterwards (completed or skipped).
    /// 0.0 for an empty tally.
    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => (self.completed + self.skipped) as f64 / n as f64,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ok, {} skipped, {} failed ({:.0}%)",
            self.completed,
            self.skipped,
            self.failed,
            self.success_rate() * 100.0
        )
    }
}

/// Aggregate over a batch: overall counts, per-platform and per-destination
/// partitions, bytes moved, and the outcomes themselves for inspection.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    overall: Tally,
    by_platform: BTreeMap<Platform, Tally>,
    by_destination: BTreeMap<PathBuf, Tally>,
    bytes: u64,
    outcomes: Vec<FetchOutcome>,
}

impl BatchReport {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = FetchOutcome>,
    {
        let mut report = Self::default();
        for o in outcomes {
            report.record(o);
        }
        report
    }

    /// Folds one outcome in.
    pub fn record(&mut self, outcome: FetchOutcome) {
        let status = outcome.status();
        self.overall.add(status);
        self.by_platform
            .entry(outcome.task().platform())
            .or_default()
            .add(status);
        self.by_destination
            .entry(outcome.task().destination_dir().to_path_buf())
            .or_default()
            .add(status);
        self.bytes += outcome.bytes().unwrap_or(0);
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.overall.total()
    }

    pub fn completed(&self) -> usize {
        self.overall.completed
    }

    pub fn skipped(&self) -> usize {
        self.overall.skipped
    }

    pub fn failed(&self) -> usize {
        self.overall.failed
    }

    pub fn has_failures(&self) -> bool {
        self.overall.failed > 0
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn by_platform(&self) -> &BTreeMap<Platform, Tally> {
        &self.by_platform
    }

    pub fn by_destination(&self) -> &BTreeMap<PathBuf, Tally> {
        &self.by_destination
    }

    pub fn destination(&self, dir: &Path) -> Option<&Tally> {
        self.by_destination.get(dir)
    }

    /// Outcomes in completion order.
    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status() == FetchStatus::Failed)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} task(s): {}", self.total(), self.overall)?;
        writeln!(f, "{:.1} MiB transferred", self.bytes as f64 / 1_048_576.0)?;
        if !self.by_platform.is_empty() {
            writeln!(f, "by platform:")?;
            for (platform, tally) in &self.by_platform {
                writeln!(f, "  {:<10} {}", platform.label(), tally)?;
            }
        }
        if !self.by_destination.is_empty() {
            writeln!(f, "by destination:")?;
            for (dir, tally) in &self.by_destination {
                writeln!(f, "  {} {}", dir.display(), tally)?;
            }
        }
        for o in self.failures() {
            writeln!(
                f,
                "failed: {} ({})",
                o.task().source_url(),
                o.error_detail().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}
