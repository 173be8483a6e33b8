//! Staff and system context
//!
//! Staves and systems are produced by the page layout pass. The curve engine
//! only reads them: a staff contributes its vertical placement and the drawing
//! unit used to scale thickness and height constants.

use serde::{Deserialize, Serialize};

/// Stable staff identifier
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct StaffId(pub String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        StaffId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_lines() -> u8 {
    5
}

fn default_staff_size() -> u32 {
    100
}

/// A laid-out staff
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Staff {
    pub id: StaffId,

    /// Y of the top staff line
    pub y: f64,

    /// Number of staff lines
    #[serde(default = "default_lines")]
    pub lines: u8,

    /// Staff size in percent of the document unit (100 = normal, 75 = cue)
    #[serde(default = "default_staff_size")]
    pub size: u32,
}

impl Staff {
    pub fn new(id: impl Into<String>, y: f64) -> Self {
        Self {
            id: StaffId::new(id),
            y,
            lines: default_lines(),
            size: default_staff_size(),
        }
    }

    /// Drawing unit (half a staff space) for this staff
    pub fn drawing_unit(&self, base_unit: f64) -> f64 {
        base_unit * f64::from(self.size) / 100.0
    }

    /// Distance between the top and bottom staff lines
    pub fn height(&self, base_unit: f64) -> f64 {
        f64::from(self.lines.saturating_sub(1)) * 2.0 * self.drawing_unit(base_unit)
    }

    pub fn bottom(&self, base_unit: f64) -> f64 {
        self.y + self.height(base_unit)
    }
}

/// One system (a line of music) with its horizontal extent and staves
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct System {
    /// X where the system's music starts (after clefs/key signatures)
    pub left: f64,
    pub right: f64,
    pub staves: Vec<Staff>,
}

impl System {
    pub fn staff(&self, id: &StaffId) -> Option<&Staff> {
        self.staves.iter().find(|s| &s.id == id)
    }
}
