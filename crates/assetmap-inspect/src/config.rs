//! Inspector configuration.
//!
//! Read from a YAML file (`assetmap-inspect.yaml` by default). Every field
//! has a default, so a missing file or an empty section is valid.
//!
//! ```yaml
//! logging:
//!   level: debug
//!   json: false
//! wire:
//!   max_frame_bytes: 65536
//!   reject_unknown_fields: true
//! ```

use std::path::Path;

use assetmap_wire::WireLimits;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level inspector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InspectConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Decode limits applied to every frame and record.
    #[serde(default)]
    pub wire: WireLimits,
}

impl InspectConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ASSETMAP_LOG_LEVEL` overrides `logging.level`
    /// - `ASSETMAP_MAX_FRAME_BYTES` overrides `wire.max_frame_bytes`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string only.
    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ASSETMAP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("ASSETMAP_MAX_FRAME_BYTES") {
            match val.parse() {
                Ok(max) => self.wire.max_frame_bytes = max,
                Err(e) => {
                    tracing::warn!(value = val, error = %e, "ignoring ASSETMAP_MAX_FRAME_BYTES");
                }
            }
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit log lines as JSON objects instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = InspectConfig::parse_yaml("").unwrap();
        assert_eq!(config, InspectConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.wire, WireLimits::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "logging:\n  level: debug\nwire:\n  max_frame_bytes: 4096\n";
        let config = InspectConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.wire.max_frame_bytes, 4096);
        assert_eq!(config.wire.max_text_len, WireLimits::default().max_text_len);
        assert!(!config.wire.reject_unknown_fields);
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = InspectConfig::parse_yaml("wire: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = InspectConfig::default();
        config.apply_overrides(|key| match key {
            "ASSETMAP_LOG_LEVEL" => Some("trace".to_owned()),
            "ASSETMAP_MAX_FRAME_BYTES" => Some("128".to_owned()),
            _ => None,
        });
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.wire.max_frame_bytes, 128);
    }

    #[test]
    fn unparsable_frame_limit_override_is_ignored() {
        let mut config = InspectConfig::default();
        config.apply_overrides(|key| (key == "ASSETMAP_MAX_FRAME_BYTES").then(|| "lots".to_owned()));
        assert_eq!(config.wire.max_frame_bytes, WireLimits::default().max_frame_bytes);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = InspectConfig::from_file(Path::new("/nonexistent/assetmap-inspect.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
