//! CLI command implementations

pub mod bench;
pub mod config;
pub mod run;

use anyhow::{Context, Result};
use horizon_runtime::SimConfig;
use std::path::Path;

/// Load `path` if given, otherwise the built-in defaults.
pub fn load_config(path: Option<&str>) -> Result<SimConfig> {
    match path {
        Some(p) => SimConfig::load(Path::new(p))
            .with_context(|| format!("Failed to load config {}", p)),
        None => Ok(SimConfig::default()),
    }
}
