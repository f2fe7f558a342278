//! CLI command handlers.

mod detect;
mod fetch;
mod presets;

pub use detect::run_detect;
pub use fetch::{collect_pairs, run_fetch, FetchArgs};
pub use presets::run_presets;
