use std::path::{Path, PathBuf};

use super::{data_dir, Config, Database};
use crate::error::Result;
use crate::presenter::SettingsProvider;
use crate::session::SessionSettings;

/// Reads `config.toml` and the selected users each time a session starts,
/// so edits made between sessions are picked up.
pub struct StoreSettingsProvider {
    config_path: PathBuf,
    db: Database,
}

impl StoreSettingsProvider {
    /// Provider over the default data directory.
    pub fn open() -> Result<Self> {
        Self::open_in(&data_dir()?)
    }

    pub fn open_in(dir: &Path) -> Result<Self> {
        Ok(Self {
            config_path: Config::path_in(dir),
            db: Database::open_in(dir)?,
        })
    }
}

impl SettingsProvider for StoreSettingsProvider {
    fn session_settings(&self) -> Result<SessionSettings> {
        let config = Config::load_from(&self.config_path)?;
        config.session_settings(self.db.selected_users()?)
    }
}
