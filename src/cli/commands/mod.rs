//! CLI command implementations.

pub mod preview;
pub mod run;
pub mod validate;

use anyhow::Result;
use pivot_config::AppConfig;
use std::path::Path;
use tracing::info;

/// Load the config file, falling back to defaults when it is absent.
pub(crate) fn load_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = pivot_config::load_config(path)?;
        config.validate()?;
        Ok(config)
    } else {
        info!(path = %path.display(), "config file not found; using defaults");
        Ok(AppConfig::default())
    }
}
