//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a typo in an order or
//! topology name is reported at load time rather than on first query.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::order::{Order, Topology};

/// Valid values for `output.format`.
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

/// The configuration file.
///
/// # Example
///
/// ```toml
/// [query]
/// order = "key"
/// topology = "depth"
///
/// [output]
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Query defaults
    pub query: Option<QueryDefaults>,

    /// Output defaults
    pub output: Option<OutputDefaults>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(query) = &self.query {
            query.validate()?;
        }
        if let Some(output) = &self.output {
            output.validate()?;
        }
        Ok(())
    }
}

/// Defaults for graph queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QueryDefaults {
    /// Sort order: `key`, `~key`, `def` or `~def`
    pub order: Option<String>,

    /// Traversal topology: `breadth` or `depth`
    pub topology: Option<String>,
}

impl QueryDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(order) = &self.order {
            order
                .parse::<Order>()
                .map_err(|e| ConfigError::InvalidValue(format!("query.order: {e}")))?;
        }
        if let Some(topology) = &self.topology {
            topology
                .parse::<Topology>()
                .map_err(|e| ConfigError::InvalidValue(format!("query.topology: {e}")))?;
        }
        Ok(())
    }
}

/// Defaults for command output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputDefaults {
    /// `text` or `json`
    pub format: Option<String>,
}

impl OutputDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            if !OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid output format '{}', must be one of: {}",
                    format,
                    OUTPUT_FORMATS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_valid() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_all_sections() {
        let config: ConfigFile = toml::from_str(
            r#"
            [query]
            order = "~key"
            topology = "depth"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.query.unwrap().order.as_deref(), Some("~key"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("[query]\nsort = \"key\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_order_fails_validation() {
        let config: ConfigFile = toml::from_str("[query]\norder = \"name\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("query.order"));
    }

    #[test]
    fn invalid_format_fails_validation() {
        let config: ConfigFile = toml::from_str("[output]\nformat = \"yaml\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
