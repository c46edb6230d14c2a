mod config;

pub use config::{Config, DurationsConfig, NotificationsConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Directory holding `config.toml`.
///
/// `POMOCYCLE_CONFIG_DIR` wins when set. Otherwise `~/.config/pomocycle/`,
/// or `~/.config/pomocycle-dev/` with `POMOCYCLE_ENV=dev`.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOCYCLE_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::NoConfigDir("home directory not found".into()))?
                .join(".config");

            let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomocycle-dev")
            } else {
                base_dir.join("pomocycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoConfigDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
