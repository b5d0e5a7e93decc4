//! Application configuration.
//!
//! Settings come from `config.toml` under the user's config directory,
//! overridable via `INNKEEP_*` environment variables. Every field has a
//! default, so a missing file is not an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

/// Directory name used under the platform config/data roots.
pub const APP_DIR: &str = "innkeep";

const DEFAULT_CONFIG: &str = r#"# innkeep configuration
#
# data_dir = "/path/to/storage"
# rooms_file = "rooms.json"
# bookings_file = "bookings.json"
"#;

/// Resolved application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the two JSON storage files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the room inventory, relative to `data_dir`.
    #[serde(default = "default_rooms_file")]
    pub rooms_file: String,
    /// File name of the booking collection, relative to `data_dir`.
    #[serde(default = "default_bookings_file")]
    pub bookings_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rooms_file: default_rooms_file(),
            bookings_file: default_bookings_file(),
        }
    }
}

impl AppConfig {
    /// Load settings from the config file (if present) and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from an explicit config file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("INNKEEP"))
            .build()
            .context("failed to load configuration")?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Absolute path of the rooms file.
    pub fn rooms_path(&self) -> PathBuf {
        self.data_dir.join(&self.rooms_file)
    }

    /// Absolute path of the bookings file.
    pub fn bookings_path(&self) -> PathBuf {
        self.data_dir.join(&self.bookings_file)
    }
}

/// Location of the user-editable config file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_file_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_rooms_file() -> String {
    "rooms.json".to_string()
}

fn default_bookings_file() -> String {
    "bookings.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_point_at_the_two_storage_files() {
        let config = AppConfig::default();
        assert!(config.rooms_path().ends_with("rooms.json"));
        assert!(config.bookings_path().ends_with("bookings.json"));
        assert_eq!(config.rooms_path().parent(), config.bookings_path().parent());
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/srv/hotel"
rooms_file = "inventory.json"
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.rooms_path(), PathBuf::from("/srv/hotel/inventory.json"));
        // Unset keys keep their defaults.
        assert_eq!(config.bookings_file, "bookings.json");
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(&dir.path().join("absent.toml"))?;
        assert_eq!(config.rooms_file, "rooms.json");
        Ok(())
    }
}
