//! Settings for the command-line front end.
//!
//! Stored in `~/.pvdhide/config.toml`. Every field has a default, so a
//! missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upper bound on carrier file size (50 MiB).
pub const DEFAULT_MAX_CARRIER_BYTES: u64 = 50 * 1024 * 1024;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// PSNR below which an embedded image is reported as visibly degraded.
pub const DEFAULT_MIN_PSNR_DB: f64 = 30.0;

/// Errors that can occur when loading or saving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Front-end configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StegoConfig {
    /// Carriers larger than this are refused before decoding.
    pub max_carrier_bytes: u64,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Image embeddings with a lower PSNR are logged as a warning.
    pub min_psnr_db: f64,

    /// Where stego files go when no explicit output path is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            max_carrier_bytes: DEFAULT_MAX_CARRIER_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            min_psnr_db: DEFAULT_MIN_PSNR_DB,
            output_dir: None,
        }
    }
}

impl StegoConfig {
    /// Load the configuration from the default location.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: StegoConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save the configuration to an explicit path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        // Set restrictive permissions on config file (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Resolves where a stego file named `file_name` should be written.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Get the pvdhide configuration directory (`~/.pvdhide`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".pvdhide"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = StegoConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StegoConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_carrier_bytes = 1024\n").unwrap();

        let config = StegoConfig::load_from(&path).unwrap();
        assert_eq!(config.max_carrier_bytes, 1024);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.min_psnr_db, DEFAULT_MIN_PSNR_DB);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = StegoConfig {
            log_level: "debug".to_string(),
            output_dir: Some(PathBuf::from("/tmp/stego")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(StegoConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_carrier_bytes = \"lots\"").unwrap();

        let result = StegoConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::TomlParseError(_))));
    }

    #[test]
    fn test_output_path() {
        let config = StegoConfig::default();
        assert_eq!(config.output_path("a.png"), PathBuf::from("a.png"));

        let config = StegoConfig {
            output_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        assert_eq!(config.output_path("a.png"), PathBuf::from("out/a.png"));
    }
}
