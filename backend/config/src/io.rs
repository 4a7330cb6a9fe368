//! Config file loading.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::TelefaxConfig;

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_PATH_VAR: &str = "TELEFAX_CONFIG";

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<TelefaxConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(TelefaxConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML; an empty document is the default config.
pub fn parse_config(raw: &str) -> Result<TelefaxConfig> {
    if raw.trim().is_empty() {
        return Ok(TelefaxConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
