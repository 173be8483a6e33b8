//! Diagnostics for curve layout
//!
//! Best-effort outcomes of the curve engine (an obstruction the curve could
//! not clear, a line form drawn with a fallback pen) are not errors. They are
//! reported here as marks on the curved element, next to the structural
//! problems that stopped a curve from being drawn at all.

pub mod curves;

use serde::{Deserialize, Serialize};

use crate::models::ElementId;

/// Severity level for diagnostic marks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A diagnostic mark on a curved element
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DiagnosticMark {
    /// Curved element the mark refers to
    pub element: ElementId,
    /// Segment index, when the issue is specific to one segment
    pub segment: Option<usize>,
    pub severity: DiagnosticSeverity,
    /// Kind identifier (e.g., "curve_unresolved_collision")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl DiagnosticMark {
    pub fn new(
        element: ElementId,
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element,
            segment: None,
            severity,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Attach the mark to one segment
    pub fn on_segment(mut self, segment: usize) -> Self {
        self.segment = Some(segment);
        self
    }
}

/// Collection of diagnostic marks for a score
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub marks: Vec<DiagnosticMark>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    pub fn add(&mut self, mark: DiagnosticMark) {
        self.marks.push(mark);
    }

    pub fn extend(&mut self, marks: impl IntoIterator<Item = DiagnosticMark>) {
        self.marks.extend(marks);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.marks
            .iter()
            .any(|m| m.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marks of one kind
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a DiagnosticMark> {
        self.marks.iter().filter(move |m| m.kind == kind)
    }
}
