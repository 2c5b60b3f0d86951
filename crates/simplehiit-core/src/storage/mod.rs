pub mod config;
pub mod database;
mod provider;

pub use config::{Config, SessionConfig};
pub use database::Database;
pub use provider::StoreSettingsProvider;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, `~/.config/simplehiit/` unless
/// `SIMPLEHIIT_DATA_DIR` points elsewhere.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("SIMPLEHIIT_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("simplehiit"),
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
