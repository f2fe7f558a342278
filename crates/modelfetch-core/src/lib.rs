//! Fetch orchestrator for large model artifacts.
//!
//! Pipeline: platform routing → resource location → staged fetch → batch
//! scheduling → outcome aggregation. The [`Orchestrator`] wires these together
//! from an explicit [`config::FetchConfig`].

pub mod config;
pub mod logging;

pub mod error;
pub mod fetch_head;
pub mod fetcher;
pub mod locator;
pub mod orchestrator;
pub mod platform;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod segmenter;
pub mod storage;
pub mod task;
pub mod transport;
pub mod url_model;

pub use error::FetchError;
pub use orchestrator::Orchestrator;
pub use platform::{Platform, PlatformRouter};
pub use report::BatchReport;
pub use task::{DownloadTask, FetchOutcome, FetchStatus};
