//! Engraving options
//!
//! Document-wide values read by the curve engine. Every field has a default,
//! so a partial JSON/YAML document only needs to name what it overrides.
//! Lengths are in drawing units (half a staff space) unless noted.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Iteration bound for the collision search of one curve
///
/// Reaching it is not an error: the best curve found so far is kept.
pub const DEFAULT_MAX_ITERATIONS: usize = 12;

/// Engraving configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngravingOptions {
    /// Device units per drawing unit at staff size 100
    pub unit: f64,

    /// Pen width at the curve endpoints
    pub slur_endpoint_thickness: f64,

    /// Ribbon thickness at the middle of the curve
    pub slur_midpoint_thickness: f64,

    /// Minimum curvature height
    pub slur_min_height: f64,

    /// Maximum curvature height before the direction is flipped
    pub slur_max_height: f64,

    /// Additional height per device unit of span width
    pub slur_height_ratio: f64,

    /// Horizontal inset of the control points, as a fraction of the span
    pub slur_control_inset: f64,

    /// Gap between a notehead and the curve endpoint
    pub slur_endpoint_offset: f64,

    /// Required gap between the curve and an obstacle
    pub slur_clearance: f64,

    /// Bound on collision-resolution iterations
    pub slur_max_iterations: usize,

    /// Flattening tolerance in device units when approximating curves
    pub flatten_tolerance: f64,
}

impl Default for EngravingOptions {
    fn default() -> Self {
        Self {
            unit: 9.0,
            slur_endpoint_thickness: 0.1,
            slur_midpoint_thickness: 0.6,
            slur_min_height: 1.2,
            slur_max_height: 6.0,
            slur_height_ratio: 0.05,
            slur_control_inset: 0.2,
            slur_endpoint_offset: 1.0,
            slur_clearance: 0.5,
            slur_max_iterations: DEFAULT_MAX_ITERATIONS,
            flatten_tolerance: 0.25,
        }
    }
}

impl EngravingOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: EngravingOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let options: EngravingOptions = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from a `.yaml`/`.yml` or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loading engraving options from {}", path.display());

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Reject values the curve engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.unit.is_finite() && self.unit > 0.0) {
            return Err(ConfigError::Invalid(format!("unit must be positive, got {}", self.unit)));
        }
        if self.slur_max_iterations == 0 {
            return Err(ConfigError::Invalid("slur_max_iterations must be at least 1".to_string()));
        }
        let non_negative = [
            ("slur_endpoint_thickness", self.slur_endpoint_thickness),
            ("slur_midpoint_thickness", self.slur_midpoint_thickness),
            ("slur_min_height", self.slur_min_height),
            ("slur_height_ratio", self.slur_height_ratio),
            ("slur_endpoint_offset", self.slur_endpoint_offset),
            ("slur_clearance", self.slur_clearance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be non-negative, got {}", name, value)));
            }
        }
        if self.slur_max_height < self.slur_min_height {
            return Err(ConfigError::Invalid(format!(
                "slur_max_height ({}) is below slur_min_height ({})",
                self.slur_max_height, self.slur_min_height
            )));
        }
        if !(0.0..0.5).contains(&self.slur_control_inset) {
            return Err(ConfigError::Invalid(format!(
                "slur_control_inset must be in [0, 0.5), got {}",
                self.slur_control_inset
            )));
        }
        if !(self.flatten_tolerance > 0.0) {
            return Err(ConfigError::Invalid("flatten_tolerance must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngravingOptions::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = EngravingOptions::from_json(r#"{"slur_endpoint_thickness": 0.2}"#).unwrap();
        assert_eq!(options.slur_endpoint_thickness, 0.2);
        assert_eq!(options.slur_max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_yaml_options() {
        let options = EngravingOptions::from_yaml("unit: 10.0\nslur_max_iterations: 3\n").unwrap();
        assert_eq!(options.unit, 10.0);
        assert_eq!(options.slur_max_iterations, 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngravingOptions::from_json(r#"{"unit": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngravingOptions::from_json(r#"{"slur_max_iterations": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngravingOptions::from_json(r#"{"slur_min_height": 4.0, "slur_max_height": 2.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngravingOptions::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "slur_clearance: 1.5").unwrap();
        let options = EngravingOptions::from_file(yaml.path()).unwrap();
        assert_eq!(options.slur_clearance, 1.5);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"slur_min_height": 2.0}}"#).unwrap();
        let options = EngravingOptions::from_file(json.path()).unwrap();
        assert_eq!(options.slur_min_height, 2.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngravingOptions::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
