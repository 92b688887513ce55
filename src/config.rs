//! Encoder configuration
//!
//! One serializable struct carries every tunable of the encoding pipeline.
//! `delta` and `samples_per_axis` control reconstruction accuracy; the
//! defaults follow the MiniGrid setup (7×7 view, band width 2, 50 samples).
//!
//! # Example
//!
//! ```
//! use ssp_minigrid::config::EncoderConfig;
//!
//! let config = EncoderConfig::default()
//!     .with_dimension(512)
//!     .with_delta(3.0)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//! ```

use crate::reconstruction::TableParams;
use crate::{Result, SspError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Pointer dimension `d`
    pub dimension: usize,

    /// Agent view width `W` (columns)
    pub view_width: usize,

    /// Agent view height `H` (rows)
    pub view_height: usize,

    /// Continuous width of one grid cell
    pub delta: f64,

    /// Samples per axis when smoothing a cell's pointer
    pub samples_per_axis: usize,

    /// Coordinate radius of the observation space
    pub space_radius: f64,

    /// Seed for basis and vocabulary generation
    pub seed: u64,

    /// Longest mission string the mission encoder accepts
    pub mission_max_len: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            view_width: 7,
            view_height: 7,
            delta: 2.0,
            samples_per_axis: 50,
            space_radius: 1.0,
            seed: 0,
            mission_max_len: 96,
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub const fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    #[must_use]
    pub const fn with_view(mut self, width: usize, height: usize) -> Self {
        self.view_width = width;
        self.view_height = height;
        self
    }

    #[must_use]
    pub const fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    #[must_use]
    pub const fn with_samples_per_axis(mut self, samples: usize) -> Self {
        self.samples_per_axis = samples;
        self
    }

    #[must_use]
    pub const fn with_space_radius(mut self, radius: f64) -> Self {
        self.space_radius = radius;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_mission_max_len(mut self, len: usize) -> Self {
        self.mission_max_len = len;
        self
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(SspError::Configuration("dimension must be positive".into()));
        }
        self.table_params().validate()?;
        if !(self.space_radius.is_finite() && self.space_radius > 0.0) {
            return Err(SspError::Configuration(format!(
                "space_radius must be positive and finite, got {}",
                self.space_radius
            )));
        }
        if self.mission_max_len == 0 {
            return Err(SspError::Configuration(
                "mission_max_len must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Reconstruction table parameters derived from this config
    pub fn table_params(&self) -> TableParams {
        TableParams {
            width: self.view_width,
            height: self.view_height,
            delta: self.delta,
            samples_per_axis: self.samples_per_axis,
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SspError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(SspError::Io)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EncoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimension, 256);
        assert_eq!((config.view_width, config.view_height), (7, 7));
    }

    #[test]
    fn test_builder() {
        let config = EncoderConfig::default()
            .with_dimension(64)
            .with_view(5, 3)
            .with_delta(1.5)
            .with_samples_per_axis(10)
            .with_seed(99);

        let params = config.table_params();
        assert_eq!(params.width, 5);
        assert_eq!(params.height, 3);
        assert_eq!(params.delta, 1.5);
        assert_eq!(params.samples_per_axis, 10);
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_invalid_fields() {
        assert!(EncoderConfig::default().with_dimension(0).validate().is_err());
        assert!(EncoderConfig::default().with_view(0, 7).validate().is_err());
        assert!(EncoderConfig::default().with_delta(0.0).validate().is_err());
        assert!(EncoderConfig::default().with_delta(f64::NAN).validate().is_err());
        assert!(EncoderConfig::default().with_samples_per_axis(0).validate().is_err());
        assert!(EncoderConfig::default().with_space_radius(-1.0).validate().is_err());
        assert!(EncoderConfig::default().with_mission_max_len(0).validate().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = EncoderConfig::from_json_str(r#"{"dimension": 512, "delta": 3.0}"#).unwrap();
        assert_eq!(config.dimension, 512);
        assert_eq!(config.delta, 3.0);
        assert_eq!(config.samples_per_axis, 50);
    }

    #[test]
    fn test_json_invalid_rejected() {
        assert!(matches!(
            EncoderConfig::from_json_str(r#"{"dimension": 0}"#),
            Err(SspError::Configuration(_))
        ));
        assert!(matches!(
            EncoderConfig::from_json_str("not json"),
            Err(SspError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("encoder.json");
        let config = EncoderConfig::default().with_seed(5);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(EncoderConfig::load(&path).unwrap(), config);
    }
}
