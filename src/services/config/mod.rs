pub mod models;

pub use models::*;

use crate::types::{DistributionError, DistributionResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// File-backed settings (`config.json`), cached in memory.
pub struct ConfigService {
    config_path: PathBuf,
    settings: Mutex<ResolverSettings>,
}

impl ConfigService {
    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_file(&config_path);
        Self {
            config_path,
            settings: Mutex::new(settings),
        }
    }

    /// Missing file means first run; a corrupt file is logged and replaced by
    /// defaults in memory (the file itself is left alone until the next save).
    fn load_from_file(path: &Path) -> ResolverSettings {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ResolverSettings::default();
            }
            Err(e) => {
                log::error!("Failed to read settings {}: {e}", path.display());
                return ResolverSettings::default();
            }
        };

        match serde_json::from_str::<ResolverSettings>(&content) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                log::error!("Failed to parse settings {}: {e}", path.display());
                ResolverSettings::default()
            }
        }
    }

    pub fn get_settings(&self) -> ResolverSettings {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_settings(&self, new_settings: ResolverSettings) -> DistributionResult<()> {
        let new_settings = new_settings.normalized();
        Self::write_atomically(&self.config_path, &new_settings)?;

        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_settings;
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the target.
    fn write_atomically(path: &Path, settings: &ResolverSettings) -> DistributionResult<()> {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(settings)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path)
            .map_err(|e| DistributionError::Io(format!("Failed to save settings: {e}")))?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
