//! Configuration validation

use crate::{BundleConfig, ConfigError, Result, VizConfig};
use tviz_tensor::EncoderConfig;

/// Highest zlib level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

impl VizConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        validate_encoder(&self.encoder)?;
        validate_bundle(&self.bundle)?;
        Ok(())
    }
}

/// Check the compression level range
pub fn validate_encoder(config: &EncoderConfig) -> Result<()> {
    if config.compression.level > MAX_COMPRESSION_LEVEL {
        return Err(ConfigError::InvalidValue {
            field: "encoder.compression.level".into(),
            message: format!(
                "must be between 0 and {}, got {}",
                MAX_COMPRESSION_LEVEL, config.compression.level
            ),
        });
    }
    Ok(())
}

/// Check that a configured bundle path points at a file
pub fn validate_bundle(config: &BundleConfig) -> Result<()> {
    if let Some(path) = &config.path {
        if !path.is_file() {
            return Err(ConfigError::BundleNotFound(path.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(VizConfig::default().validate().is_ok());
    }

    #[test]
    fn test_level_bounds() {
        let mut config = VizConfig::default();
        config.encoder.compression.level = 9;
        assert!(config.validate().is_ok());

        config.encoder.compression.level = 10;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "encoder.compression.level"
        ));
    }

    #[test]
    fn test_bundle_path_must_exist() {
        let mut config = VizConfig::default();
        config.bundle.path = Some(PathBuf::from("/nonexistent/renderer.js"));
        assert!(matches!(config.validate(), Err(ConfigError::BundleNotFound(_))));

        let file = NamedTempFile::new().unwrap();
        config.bundle.path = Some(file.path().to_path_buf());
        assert!(config.validate().is_ok());
    }
}
