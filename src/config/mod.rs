//! Configuration for the fusion filter and its calibration search.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibration::AlphaCandidates;
use crate::fusion::{validate_alpha, DEFAULT_ALPHA};
use crate::utils::error::{Error, Result};
use crate::utils::{init_logging, parse_level};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Blend coefficient used by `fuse` when no override is given
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Log level (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Alpha search settings
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Alpha search configuration
///
/// The candidate grid is `start, start + step, ...` strictly below `stop`,
/// unless an explicit `candidates` list is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_grid_start")]
    pub start: f64,

    #[serde(default = "default_grid_stop")]
    pub stop: f64,

    #[serde(default = "default_grid_step")]
    pub step: f64,

    /// Explicit candidate list; takes precedence over the grid bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<f64>>,

    /// Score candidates on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_grid_start() -> f64 {
    0.0
}
fn default_grid_stop() -> f64 {
    1.0
}
fn default_grid_step() -> f64 {
    0.01
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            log_level: default_log_level(),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            start: default_grid_start(),
            stop: default_grid_stop(),
            step: default_grid_step(),
            candidates: None,
            parallel: false,
        }
    }
}

impl CalibrationConfig {
    /// Candidate set described by this section.
    pub fn candidates(&self) -> Result<AlphaCandidates> {
        match &self.candidates {
            Some(values) => AlphaCandidates::from_values(values.clone()),
            None => AlphaCandidates::arange(self.start, self.stop, self.step),
        }
    }
}

impl FusionConfig {
    /// Serialize default config to TOML string
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration for reasonable values
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.alpha)
            .map_err(|_| Error::ConfigError(format!("alpha must be in [0, 1], got {}", self.alpha)))?;
        parse_level(&self.log_level)?;
        self.calibration
            .candidates()
            .map_err(|e| Error::ConfigError(format!("invalid calibration grid: {}", e)))?;
        Ok(())
    }

    /// Install the global logger at the configured `log_level`
    pub fn init_logging(&self) -> Result<()> {
        init_logging(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = FusionConfig::default();
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.log_level, "info");
        assert!(!config.calibration.parallel);
        assert_eq!(config.calibration.candidates().unwrap().len(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("fusion.toml");

        let mut config = FusionConfig::default();
        config.alpha = 0.35;
        config.calibration.candidates = Some(vec![0.2, 0.4]);
        config.save_to_file(&config_path).unwrap();

        let loaded = FusionConfig::from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = FusionConfig::from_toml_str("alpha = 0.25\n").unwrap();
        assert_eq!(config.alpha, 0.25);
        assert_eq!(config.calibration, CalibrationConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            FusionConfig::from_toml_str("alpha = 1.5\n"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            FusionConfig::from_toml_str("[calibration]\nstep = -0.1\n"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            FusionConfig::from_toml_str("log_level = \"loud\"\n"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            FusionConfig::from_toml_str("alpha = \"high\"\n"),
            Err(Error::TomlError(_))
        ));
    }

    #[test]
    fn test_tiny_step_is_an_error_not_a_panic() {
        assert!(matches!(
            FusionConfig::from_toml_str("[calibration]\nstep = 1e-20\n"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            FusionConfig::from_toml_str("[calibration]\nstop = 1e30\nstep = 1.0\n"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_init_logging_from_config() {
        let config = FusionConfig::from_toml_str("log_level = \"debug\"\n").unwrap();
        assert!(config.init_logging().is_ok());

        let mut bad = FusionConfig::default();
        bad.log_level = "chatty".to_string();
        assert!(matches!(bad.init_logging(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_default_toml() {
        let toml = FusionConfig::default_toml().unwrap();
        assert!(toml.contains("alpha = 0.1"));
        assert!(toml.contains("[calibration]"));
        assert!(!toml.contains("candidates"));
    }
}
