//! Configuration structures and loading

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tviz_telemetry::{LogConfig, LogLevel};
use tviz_tensor::EncoderConfig;

/// Overrides `encoder.compression.level`
pub const ENV_COMPRESSION_LEVEL: &str = "TVIZ_COMPRESSION_LEVEL";
/// `zlib` enables compression, `none` or `off` disables it
pub const ENV_COMPRESSION: &str = "TVIZ_COMPRESSION";
/// Overrides `encoder.shuffle`
pub const ENV_SHUFFLE: &str = "TVIZ_SHUFFLE";
/// Overrides `bundle.path`
pub const ENV_BUNDLE_PATH: &str = "TVIZ_BUNDLE_PATH";
/// Overrides `logging.level`
pub const ENV_LOG_LEVEL: &str = "TVIZ_LOG_LEVEL";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Wire encoder settings
    pub encoder: EncoderConfig,
    /// Renderer bundle location
    pub bundle: BundleConfig,
    /// Logging settings
    pub logging: LogConfig,
}

/// Location of the compiled renderer script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Path to the renderer's JavaScript bundle
    pub path: Option<PathBuf>,
}

impl VizConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TVIZ_*` environment variables on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// `lookup` returns the raw value for a variable name, or `None` when it
    /// is unset.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_COMPRESSION_LEVEL) {
            self.encoder.compression.level = value
                .trim()
                .parse()
                .map_err(|_| env_error(ENV_COMPRESSION_LEVEL, &value, "an integer"))?;
        }

        if let Some(value) = lookup(ENV_COMPRESSION) {
            self.encoder.compression.enabled = match value.trim().to_lowercase().as_str() {
                "zlib" => true,
                "none" | "off" => false,
                _ => return Err(env_error(ENV_COMPRESSION, &value, "zlib or none")),
            };
        }

        if let Some(value) = lookup(ENV_SHUFFLE) {
            self.encoder.shuffle =
                parse_bool(&value).ok_or_else(|| env_error(ENV_SHUFFLE, &value, "a boolean"))?;
        }

        if let Some(value) = lookup(ENV_BUNDLE_PATH) {
            self.bundle.path = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value.parse::<LogLevel>().map_err(|_| {
                env_error(ENV_LOG_LEVEL, &value, "trace, debug, info, warn, or error")
            })?;
        }

        Ok(())
    }
}

fn env_error(var: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::EnvVar {
        var,
        value: value.to_string(),
        expected,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tviz_telemetry::LogFormat;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = VizConfig::default();
        assert_eq!(config.encoder, EncoderConfig::default());
        assert_eq!(config.bundle.path, None);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[encoder]
shuffle = false

[encoder.compression]
level = 6

[bundle]
path = "/opt/tviz/index.js"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = VizConfig::from_file(file.path()).unwrap();
        assert!(!config.encoder.shuffle);
        assert!(config.encoder.compression.enabled);
        assert_eq!(config.encoder.compression.level, 6);
        assert_eq!(config.bundle.path, Some(PathBuf::from("/opt/tviz/index.js")));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_file() {
        let err = VizConfig::from_file(Path::new("/nonexistent/tviz.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = VizConfig::from_toml("[encoder\nshuffle = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = VizConfig::default();
        config.encoder.compression.level = 9;
        config.bundle.path = Some(PathBuf::from("renderer.js"));
        let parsed = VizConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = VizConfig::default();
        config
            .apply_overrides_from(env(&[
                (ENV_COMPRESSION_LEVEL, "4"),
                (ENV_COMPRESSION, "NONE"),
                (ENV_SHUFFLE, "off"),
                (ENV_BUNDLE_PATH, "/srv/bundle.js"),
                (ENV_LOG_LEVEL, "warning"),
            ]))
            .unwrap();

        assert_eq!(config.encoder.compression.level, 4);
        assert!(!config.encoder.compression.enabled);
        assert!(!config.encoder.shuffle);
        assert_eq!(config.bundle.path, Some(PathBuf::from("/srv/bundle.js")));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_unset_env_leaves_values() {
        let mut config = VizConfig::default();
        config.encoder.compression.level = 7;
        config.apply_overrides_from(env(&[])).unwrap();
        assert_eq!(config.encoder.compression.level, 7);
    }

    #[test]
    fn test_empty_bundle_path_clears() {
        let mut config = VizConfig::default();
        config.bundle.path = Some(PathBuf::from("a.js"));
        config.apply_overrides_from(env(&[(ENV_BUNDLE_PATH, "")])).unwrap();
        assert_eq!(config.bundle.path, None);
    }

    #[test]
    fn test_bad_env_values() {
        for (key, value) in [
            (ENV_COMPRESSION_LEVEL, "fast"),
            (ENV_COMPRESSION, "zstd"),
            (ENV_SHUFFLE, "maybe"),
            (ENV_LOG_LEVEL, "chatty"),
        ] {
            let mut config = VizConfig::default();
            let err = config.apply_overrides_from(env(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::EnvVar { var, .. } if var == key),
                "{} accepted {}",
                key,
                value
            );
        }
    }

    #[test]
    fn test_load_without_file() {
        let config = VizConfig::load(None).unwrap();
        assert!(config.encoder.compression.level <= 9);
    }
}
