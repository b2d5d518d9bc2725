//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, else `config.toml` in the platform config dir)
//! 3. Environment variables prefixed with `DUPSWEEP_`; `__` separates
//!    nested keys (`DUPSWEEP_LOG__MAX_BYTES=1048576`)
//! 4. Command-line flags, applied by [`Config::apply_cli`]
//!
//! # Example file
//!
//! ```toml
//! default_root = "/home/me/Downloads"
//! backup_dir_name = "Duplicates_Backup"
//! follow_symlinks = false
//! extensions = [".jpg", ".png"]
//!
//! [log]
//! file_name = "dupsweep.log"
//! max_bytes = 5242880
//! max_files = 5
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named with `--config` does not exist.
    #[error("Configuration file not found: {0}")]
    MissingFile(PathBuf),

    /// A source could not be parsed or has values of the wrong type.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// Values parsed but are not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Rotating log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory of the log file; platform data dir when unset.
    pub directory: Option<PathBuf>,
    /// Name of the active log file.
    pub file_name: String,
    /// Size at which the active file is rotated.
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "dupsweep.log".to_string(),
            max_bytes: 5 * 1024 * 1024,
            max_files: 5,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned when no path is given.
    pub default_root: Option<PathBuf>,
    /// Name of the backup folder created inside the scanned root.
    pub backup_dir_name: String,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: bool,
    /// Default file-type filter, used when `--ext` is absent.
    pub extensions: Vec<String>,
    /// Logging.
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_root: None,
            backup_dir_name: "Duplicates_Backup".to_string(),
            follow_symlinks: false,
            extensions: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// # Errors
    ///
    /// Fails when an explicit file is missing, when any source is malformed,
    /// or when [`Config::validate`] rejects the result.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::default_config_path(),
        };

        if let Some(ref path) = file {
            log::debug!("Configuration file: {}", path.display());
        }

        let config: Self = Self::figment(file.as_deref())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults merged with an optional TOML file, without the environment.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        }
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "log.max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.log.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "log.file_name must not be empty".to_string(),
            ));
        }
        if self.backup_dir_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backup_dir_name must not be empty".to_string(),
            ));
        }
        if self
            .backup_dir_name
            .chars()
            .any(std::path::is_separator)
        {
            return Err(ConfigError::Invalid(format!(
                "backup_dir_name must be a plain folder name, got '{}'",
                self.backup_dir_name
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if let Some(ref dir) = cli.log_dir {
            self.log.directory = Some(dir.clone());
        }
    }

    /// Directory that holds the log file.
    #[must_use]
    pub fn log_directory(&self) -> PathBuf {
        if let Some(ref dir) = self.log.directory {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "dupsweep", "dupsweep")
    }
}
