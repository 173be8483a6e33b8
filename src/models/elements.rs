//! Notation elements as seen by the curve engine
//!
//! Each element is an enum-tagged kind composed from small capability structs
//! (color, enclosure, external symbol, placement, ...). Callers ask "does this
//! element carry capability X" through the typed accessors on
//! [`NotationElement`], which return `Option<&Att...>`.

use serde::{Deserialize, Serialize};

use super::geometry::{Rect, RectDef};
use super::staff::StaffId;
use crate::renderers::font_utils::{
    self, ACCIDENTAL_DOUBLE_FLAT, ACCIDENTAL_DOUBLE_SHARP, ACCIDENTAL_FLAT, ACCIDENTAL_NATURAL,
    ACCIDENTAL_SHARP, BRACKET_LEFT, BRACKET_RIGHT, FERMATA_ABOVE, FERMATA_BELOW,
    FERMATA_LONG_ABOVE, FERMATA_LONG_BELOW, FERMATA_SHORT_ABOVE, FERMATA_SHORT_BELOW,
    FERMATA_VERY_LONG_ABOVE, FERMATA_VERY_LONG_BELOW, FERMATA_VERY_SHORT_ABOVE,
    FERMATA_VERY_SHORT_BELOW, PARENS_LEFT, PARENS_RIGHT,
};

/// Stable element identifier (the document's xml:id)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Capability structs
// ============================================================================

/// Color attribute
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AttColor {
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Enclosure {
    Paren,
    Brack,
}

/// Enclosing characters (parentheses or brackets drawn around a symbol)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttEnclosingChars {
    pub enclose: Enclosure,
}

impl AttEnclosingChars {
    /// Left and right enclosing glyphs
    pub fn glyphs(&self) -> (char, char) {
        match self.enclose {
            Enclosure::Paren => (PARENS_LEFT, PARENS_RIGHT),
            Enclosure::Brack => (BRACKET_LEFT, BRACKET_RIGHT),
        }
    }
}

/// External symbol override (`glyph.num` / `glyph.name`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct AttExtSym {
    #[serde(default)]
    pub glyph_num: Option<u32>,
    #[serde(default)]
    pub glyph_name: Option<String>,
}

impl AttExtSym {
    /// The overriding glyph, if one is given and the font provides it
    pub fn resolve(&self) -> Option<char> {
        self.glyph_num
            .and_then(font_utils::glyph_by_code)
            .or_else(|| self.glyph_name.as_deref().and_then(font_utils::glyph_by_name))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FermataForm {
    /// Upright (opening downwards, placed above)
    Norm,
    /// Inverted (opening upwards, placed below)
    Inv,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FermataShape {
    Curved,
    Square,
    Angular,
}

/// Fermata visual attributes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AttFermataVis {
    #[serde(default)]
    pub form: Option<FermataForm>,
    #[serde(default)]
    pub shape: Option<FermataShape>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRel {
    Above,
    Below,
    Within,
}

/// Placement relative to the staff
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttPlacementRelStaff {
    pub place: StaffRel,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Sharp,
    Flat,
    Natural,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    pub fn glyph(self) -> char {
        match self {
            Accidental::Sharp => ACCIDENTAL_SHARP,
            Accidental::Flat => ACCIDENTAL_FLAT,
            Accidental::Natural => ACCIDENTAL_NATURAL,
            Accidental::DoubleSharp => ACCIDENTAL_DOUBLE_SHARP,
            Accidental::DoubleFlat => ACCIDENTAL_DOUBLE_FLAT,
        }
    }
}

/// Accidental attribute
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttAccidental {
    pub accid: Accidental,
}

// ============================================================================
// Element kinds
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StemDirection {
    Up,
    Down,
}

/// Vertical alignment of a glyph relative to its anchor y
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
}

/// A fermata (pause) sign
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Fermata {
    #[serde(default)]
    pub color: Option<AttColor>,
    #[serde(default)]
    pub enclosing: Option<AttEnclosingChars>,
    #[serde(default)]
    pub ext_sym: Option<AttExtSym>,
    #[serde(default)]
    pub vis: AttFermataVis,
    #[serde(default)]
    pub placement: Option<AttPlacementRelStaff>,
}

impl Fermata {
    /// SMuFL glyph for this fermata
    ///
    /// First matching rule wins: explicit glyph (number, then name), then the
    /// form (type) decides orientation within the shape's family, then the
    /// shape alone, then the default curved fermata above.
    pub fn glyph(&self) -> char {
        if let Some(glyph) = self.ext_sym.as_ref().and_then(AttExtSym::resolve) {
            return glyph;
        }

        let below = match self.vis.form {
            Some(FermataForm::Inv) => true,
            Some(FermataForm::Norm) => false,
            None => matches!(
                self.placement,
                Some(AttPlacementRelStaff {
                    place: StaffRel::Below
                })
            ),
        };

        let (above_glyph, below_glyph) = match self.vis.shape {
            Some(FermataShape::Angular) => (FERMATA_SHORT_ABOVE, FERMATA_SHORT_BELOW),
            Some(FermataShape::Square) => (FERMATA_LONG_ABOVE, FERMATA_LONG_BELOW),
            Some(FermataShape::Curved) | None => (FERMATA_ABOVE, FERMATA_BELOW),
        };

        if below {
            below_glyph
        } else {
            above_glyph
        }
    }

    /// Parentheses / brackets from the enclose attribute
    pub fn enclosing_glyphs(&self) -> Option<(char, char)> {
        self.enclosing.map(|e| e.glyphs())
    }

    /// Vertical alignment for a fermata code point
    ///
    /// Glyphs drawn above sit on their anchor, glyphs drawn below hang from it.
    pub fn vertical_alignment(code: char) -> VerticalAlignment {
        match code {
            FERMATA_ABOVE
            | FERMATA_VERY_SHORT_ABOVE
            | FERMATA_SHORT_ABOVE
            | FERMATA_LONG_ABOVE
            | FERMATA_VERY_LONG_ABOVE => VerticalAlignment::Bottom,
            FERMATA_BELOW
            | FERMATA_VERY_SHORT_BELOW
            | FERMATA_SHORT_BELOW
            | FERMATA_LONG_BELOW
            | FERMATA_VERY_LONG_BELOW => VerticalAlignment::Top,
            _ => VerticalAlignment::Middle,
        }
    }
}

/// An accidental in a key signature
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KeyAccid {
    pub accidental: AttAccidental,
    #[serde(default)]
    pub color: Option<AttColor>,
    #[serde(default)]
    pub enclosing: Option<AttEnclosingChars>,
}

impl KeyAccid {
    /// SMuFL string for the accidental, including enclosing brackets
    pub fn symbol_str(&self) -> String {
        let glyph = self.accidental.accid.glyph();
        match self.enclosing {
            Some(enclosing) => {
                let (left, right) = enclosing.glyphs();
                [left, glyph, right].iter().collect()
            }
            None => glyph.to_string(),
        }
    }
}

/// An articulation mark (staccato, accent, ...)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Articulation {
    #[serde(default)]
    pub color: Option<AttColor>,
    #[serde(default)]
    pub placement: Option<AttPlacementRelStaff>,
}

/// Kind-specific payload of a notation element
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Note {
        #[serde(default)]
        stem: Option<StemDirection>,
    },
    Rest,
    Stem,
    Beam,
    Accid,
    Dynamic,
    Articulation(Articulation),
    Fermata(Fermata),
    KeyAccid(KeyAccid),
    Other,
}

impl ElementKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            ElementKind::Note { .. } => "Note",
            ElementKind::Rest => "Rest",
            ElementKind::Stem => "Stem",
            ElementKind::Beam => "Beam",
            ElementKind::Accid => "Accid",
            ElementKind::Dynamic => "Dynam",
            ElementKind::Articulation(_) => "Artic",
            ElementKind::Fermata(_) => "Fermata",
            ElementKind::KeyAccid(_) => "KeyAccid",
            ElementKind::Other => "Other",
        }
    }
}

/// A positioned notation element on a staff
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotationElement {
    pub id: ElementId,
    #[serde(default)]
    pub system: usize,
    pub staff: StaffId,
    #[serde(with = "RectDef")]
    pub bbox: Rect,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl NotationElement {
    pub fn new(id: impl Into<String>, staff: impl Into<String>, bbox: Rect, kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(id),
            system: 0,
            staff: StaffId::new(staff),
            bbox,
            kind,
        }
    }

    pub fn in_system(mut self, system: usize) -> Self {
        self.system = system;
        self
    }

    pub fn color(&self) -> Option<&AttColor> {
        match &self.kind {
            ElementKind::Fermata(f) => f.color.as_ref(),
            ElementKind::KeyAccid(k) => k.color.as_ref(),
            ElementKind::Articulation(a) => a.color.as_ref(),
            _ => None,
        }
    }

    pub fn enclosing_chars(&self) -> Option<&AttEnclosingChars> {
        match &self.kind {
            ElementKind::Fermata(f) => f.enclosing.as_ref(),
            ElementKind::KeyAccid(k) => k.enclosing.as_ref(),
            _ => None,
        }
    }

    pub fn ext_sym(&self) -> Option<&AttExtSym> {
        match &self.kind {
            ElementKind::Fermata(f) => f.ext_sym.as_ref(),
            _ => None,
        }
    }

    pub fn placement(&self) -> Option<&AttPlacementRelStaff> {
        match &self.kind {
            ElementKind::Fermata(f) => f.placement.as_ref(),
            ElementKind::Articulation(a) => a.placement.as_ref(),
            _ => None,
        }
    }

    pub fn accidental(&self) -> Option<&AttAccidental> {
        match &self.kind {
            ElementKind::KeyAccid(k) => Some(&k.accidental),
            _ => None,
        }
    }

    pub fn stem_direction(&self) -> Option<StemDirection> {
        match self.kind {
            ElementKind::Note { stem } => stem,
            _ => None,
        }
    }

    /// Whether this element positions itself around curves it sits under/over
    pub fn avoids_curves(&self) -> bool {
        matches!(self.kind, ElementKind::Articulation(_) | ElementKind::Fermata(_))
    }
}
