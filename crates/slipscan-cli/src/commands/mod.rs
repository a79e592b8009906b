//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod scan;

use std::path::{Path, PathBuf};

use slipscan_core::SlipscanConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slipscan")
        .join("config.json")
}

/// Load configuration from an explicit path, the default location, or
/// fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SlipscanConfig> {
    if let Some(path) = config_path {
        return Ok(SlipscanConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(SlipscanConfig::from_file(&path)?)
    } else {
        Ok(SlipscanConfig::default())
    }
}
