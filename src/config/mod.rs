mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<InteractiveConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: InteractiveConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from the given path or return the defaults
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<InteractiveConfig> {
    match custom_path {
        Some(path) => load_config(path),
        None => Ok(InteractiveConfig::default()),
    }
}

/// Validate configuration
fn validate_config(config: &InteractiveConfig) -> Result<()> {
    if config.engine.bundle_url.is_empty() {
        anyhow::bail!("Engine bundle URL cannot be empty");
    }

    if config.engine.partner_marker.is_empty() {
        anyhow::bail!("Partner marker cannot be empty");
    }

    if config.timing.epsilon_ms < 0.0 {
        anyhow::bail!("epsilon_ms cannot be negative");
    }

    if config.timing.end_guard_ms < 0.0 {
        anyhow::bail!("end_guard_ms cannot be negative");
    }

    if config.timing.seek_threshold_secs <= 0.0 {
        anyhow::bail!("seek_threshold_secs must be positive");
    }

    Ok(())
}
