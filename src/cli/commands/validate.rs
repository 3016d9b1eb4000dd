//! Validate-config command implementation.

use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = pivot_config::load_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    config.validate()?;

    println!("Configuration OK: {}", config_path.display());
    println!("  app:                  {}", config.app.name);
    println!("  engine.confirmation_lag:      {}", config.engine.confirmation_lag);
    println!("  engine.use_trend_filter:      {}", config.engine.use_trend_filter);
    println!("  engine.minimum_bars_required: {}", config.engine.minimum_bars_required);
    println!("  runner.workers:       {}", config.runner.workers);
    println!("  data.dir:             {}", config.data.dir);
    println!("  output.path:          {}", config.output.path);

    Ok(())
}
