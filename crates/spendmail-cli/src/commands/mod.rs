pub mod batch;
pub mod config;
pub mod extract;
pub mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use spendmail_core::{EngineConfig, RawMessage};

/// Default configuration file under the user config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spendmail")
        .join("config.json")
}

/// Load configuration from the given file, else the default file when it
/// exists, else the environment.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => {
            let default = default_config_path();
            if !default.exists() {
                debug!("No config at {}, reading the environment", default.display());
                return Ok(EngineConfig::from_env());
            }
            default
        }
    };

    debug!("Loading config from {}", path.display());
    EngineConfig::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Read one raw message from a JSON file.
pub fn read_message(path: &Path) -> anyhow::Result<RawMessage> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let message = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a raw message", path.display()))?;
    Ok(message)
}
