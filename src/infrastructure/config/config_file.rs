//! Config file discovery and first-run defaults.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory; pass --config")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write default config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// The `config.toml` jobsync reads at startup.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Uses `path_override` when given, otherwise the platform config directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoConfigDir`] if no override is given and the
    /// platform has no config directory.
    pub fn locate(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(CONFIG_FILE_NAME),
        };
        Ok(Self::at(path))
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing file is created with defaults, and a file
    /// that does not parse is left as is while defaults are used.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the defaults cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.write_defaults(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match toml::from_str::<AppConfig>(&content) {
            Ok(mut config) => {
                debug!(path = %self.path.display(), "Loaded config file");
                config.config = Some(self.path.clone());
                Ok(config)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Config file does not parse, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    fn write_defaults(&self) -> Result<AppConfig, ConfigError> {
        info!(path = %self.path.display(), "Writing default config");
        let config = AppConfig::default();
        let content = toml::to_string_pretty(&config)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(write_err)?;
        let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
        staged.write_all(content.as_bytes()).map_err(write_err)?;
        staged.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(config)
    }
}
