//! Curved elements (slurs, ties) and their rendered segments

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::elements::{ElementId, StemDirection};
use super::staff::StaffId;

/// Curve direction relative to the notes it connects
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CurveDirection {
    /// Not yet computed (or reset by re-justification)
    #[default]
    Undetermined = 0,
    Above = 1,
    Below = 2,
}

impl CurveDirection {
    /// The opposite side; `Undetermined` stays undetermined
    pub fn flipped(self) -> Self {
        match self {
            CurveDirection::Above => CurveDirection::Below,
            CurveDirection::Below => CurveDirection::Above,
            CurveDirection::Undetermined => CurveDirection::Undetermined,
        }
    }

    /// Sign of the vertical offset away from the notes (y grows downwards)
    pub fn sign(self) -> f64 {
        match self {
            CurveDirection::Below => 1.0,
            _ => -1.0,
        }
    }
}

/// Requested line style of a curve
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineForm {
    #[default]
    Solid,
    Dashed,
    Dotted,
    /// Declared but drawn as solid
    Wavy,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Slur,
    Tie,
    PhrasingSlur,
}

/// Voice position of an endpoint on a staff with several layers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerPosition {
    /// The only layer on the staff
    Single,
    Upper,
    Lower,
}

/// One end of a curve, anchored to a note
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CurveEndpoint {
    /// Anchor element (usually a note); excluded from the curve's obstacles
    #[serde(default)]
    pub element: Option<ElementId>,
    /// Index of the system the endpoint is laid out in
    #[serde(default)]
    pub system: usize,
    pub staff: StaffId,
    pub x: f64,
    /// Y of the notehead the curve attaches to
    pub y: f64,
    #[serde(default)]
    pub stem: Option<StemDirection>,
    #[serde(default)]
    pub layer: Option<LayerPosition>,
}

impl CurveEndpoint {
    pub fn new(staff: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            element: None,
            system: 0,
            staff: StaffId::new(staff),
            x,
            y,
            stem: None,
            layer: None,
        }
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.element = Some(ElementId::new(id));
        self
    }

    pub fn in_system(mut self, system: usize) -> Self {
        self.system = system;
        self
    }
}

/// A slur, tie or similar connecting curve
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CurvedElement {
    pub id: ElementId,
    #[serde(default)]
    pub kind: CurveKind,
    pub start: CurveEndpoint,
    pub end: CurveEndpoint,
    #[serde(default)]
    pub lform: LineForm,
    /// Explicitly requested direction (`curvedir`)
    #[serde(default)]
    pub curvedir: Option<CurveDirection>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CurvedElement {
    pub fn new(id: impl Into<String>, start: CurveEndpoint, end: CurveEndpoint) -> Self {
        Self {
            id: ElementId::new(id),
            kind: CurveKind::Slur,
            start,
            end,
            lform: LineForm::Solid,
            curvedir: None,
            color: None,
        }
    }

    /// Endpoints lie on different staves
    ///
    /// Staff ids repeat from system to system, so a curve continued onto the
    /// same staff of the next system is not cross-staff.
    pub fn is_cross_staff(&self) -> bool {
        self.start.staff != self.end.staff
    }

    /// The requested direction, ignoring an explicit `Undetermined`
    pub fn requested_direction(&self) -> Option<CurveDirection> {
        self.curvedir.filter(|d| *d != CurveDirection::Undetermined)
    }
}

/// Which part of a curve a segment draws when the curve crosses system breaks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpanningType {
    /// Both endpoints in this system
    #[default]
    Whole,
    /// Starts here, continues in a following system
    Start,
    /// Neither endpoint in this system
    Middle,
    /// Continued from a previous system, ends here
    End,
}

/// One contiguous rendered piece of a curved element
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CurveSegment {
    /// Index of the segment within its curve (0 for the first system)
    pub index: usize,
    /// Index of the system the segment is drawn in
    pub system: usize,
    /// Staff the segment is drawn on
    pub staff: StaffId,
    pub x1: f64,
    pub x2: f64,
    pub spanning: SpanningType,
}
