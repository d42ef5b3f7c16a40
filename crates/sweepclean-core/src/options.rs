//! Configuration options for sweepclean.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables shared by the volume and the classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Probe sphere radius in world units.
    pub probe_radius: f32,

    /// Whether the swept capsule test runs when the probe moved.
    pub swept_capsule: bool,

    /// Duration of one highlight pulse cycle, in seconds.
    pub pulse_period: f32,

    /// Lower end of the highlight intensity range.
    pub pulse_min: f32,

    /// Upper end of the highlight intensity range.
    pub pulse_max: f32,

    /// Size of a freshly created volume.
    pub default_volume_dimensions: Vec3,

    /// Lasso vertices closer than this (in pixels) to the last vertex are dropped.
    /// Zero keeps every distinct vertex.
    pub lasso_min_vertex_spacing: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            probe_radius: 0.05,
            swept_capsule: true,
            pulse_period: 1.0,
            pulse_min: 0.0,
            pulse_max: 1.0,
            default_volume_dimensions: Vec3::ONE,
            lasso_min_vertex_spacing: 0.0,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::info!("loaded options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Writes options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = Options::from_json_str(r#"{ "probe_radius": 0.2 }"#).unwrap();
        assert_eq!(options.probe_radius, 0.2);
        assert!(options.swept_capsule);
        assert_eq!(options.default_volume_dimensions, Vec3::ONE);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Options::from_json_str("{ probe_radius: }").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        let options = Options {
            pulse_period: 2.5,
            swept_capsule: false,
            ..Options::default()
        };
        options.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), options);
    }
}
