//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! The first file found wins:
//! 1. An explicit path (the `--config` flag)
//! 2. `$CFGRAPH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/cfgraph/config.toml`
//! 4. `~/.cfgraph/config.toml`
//!
//! A missing file is not an error; defaults are used. An explicit path that
//! does not exist is an error, and a `$CFGRAPH_CONFIG` that does not exist
//! produces a warning.
//!
//! # Example
//!
//! ```no_run
//! use cfgraph::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! println!("default order: {}", result.config.order());
//! ```

pub mod schema;

pub use schema::{ConfigFile, OutputDefaults, QueryDefaults};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::order::{Order, Topology};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CFGRAPH_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Effective configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit`, or from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated, or if `explicit` does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        if let Some(path) = explicit {
            let config = Self::read(path)?;
            return Ok(ConfigLoadResult { config, warnings });
        }

        for path in Self::search_paths(&mut warnings) {
            if path.exists() {
                let config = Self::read(&path)?;
                return Ok(ConfigLoadResult { config, warnings });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Read, parse and validate a single config file.
    pub fn read(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    fn search_paths(warnings: &mut Vec<ConfigWarning>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                warnings.push(ConfigWarning {
                    message: format!("${CONFIG_ENV} points to a missing file, ignoring it"),
                    path: path.clone(),
                });
            }
            paths.push(path);
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("cfgraph/config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cfgraph/config.toml"));
        }

        paths
    }

    /// Path of the file this config was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Default sort order. Defaults to `def`.
    pub fn order(&self) -> Order {
        self.file
            .query
            .as_ref()
            .and_then(|q| q.order.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or(Order::Def)
    }

    /// Default traversal topology. Defaults to `breadth`.
    pub fn topology(&self) -> Topology {
        self.file
            .query
            .as_ref()
            .and_then(|q| q.topology.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or(Topology::Breadth)
    }

    /// Whether output should be JSON by default. Defaults to `false`.
    pub fn json_output(&self) -> bool {
        self.file
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f == "json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.order(), Order::Def);
        assert_eq!(config.topology(), Topology::Breadth);
        assert!(!config.json_output());
        assert!(config.path().is_none());
    }

    #[test]
    fn reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[query]\norder = \"~def\"\ntopology = \"depth\"\n[output]\nformat = \"json\""
        )
        .unwrap();

        let result = Config::load(Some(file.path())).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.config.order(), Order::DefDesc);
        assert_eq!(result.config.topology(), Topology::Depth);
        assert!(result.config.json_output());
        assert_eq!(result.config.path(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query\norder = ").unwrap();
        assert!(matches!(
            Config::read(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_value_is_rejected_on_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\ntopology = \"sideways\"").unwrap();
        assert!(matches!(
            Config::read(file.path()),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
