//! Error types for curve layout and rendering
//!
//! Only structural problems are errors. Geometric best-effort outcomes (an
//! obstruction the curve could not clear, a line form drawn with a fallback
//! pen) are reported through diagnostics instead.

use thiserror::Error;

use crate::models::{ElementId, StaffId};

/// Errors raised while positioning or drawing a curve
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// No positioner exists for the segment; a measurement pass must run first
    #[error("Missing layout state for {element} segment {segment} (run a measurement pass first)")]
    MissingLayoutState { element: ElementId, segment: usize },

    /// A segment or endpoint refers to a staff the layout does not contain
    #[error("Unknown staff {staff} in system {system}")]
    UnknownStaff { staff: StaffId, system: usize },

    /// The curve cannot be split into drawable segments
    #[error("Invalid segments for {element}: {reason}")]
    InvalidSegment { element: ElementId, reason: String },
}

/// Errors loading engraving options
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML options: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Options parsed but hold unusable values
    #[error("Invalid option value: {0}")]
    Invalid(String),
}

/// Errors from a full render (layout cycle plus output)
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error("SVG output failed: {0}")]
    Svg(String),
}

impl From<quick_xml::Error> for RenderError {
    fn from(e: quick_xml::Error) -> Self {
        RenderError::Svg(e.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Svg(e.to_string())
    }
}
