//! `modelfetch presets`: list preset destinations.

use modelfetch_core::config::FetchConfig;

pub fn run_presets(cfg: &FetchConfig) {
    let width = cfg.presets.keys().map(String::len).max().unwrap_or(0);
    for (key, path) in &cfg.presets {
        println!("{:<width$}  {}", key, path.display(), width = width);
    }
}
