//! SMuFL glyph constants and lookup
//!
//! Ornament and accidental symbols are drawn from the SMuFL Private Use Area
//! of the notation font (Bravura-compatible). Element-level glyph selection
//! (fermata shape/orientation, bracketed key accidentals) lives on the element
//! types in `models::elements`; this module only owns the code points and the
//! name table used to resolve `glyph.name` / `glyph.num` overrides.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

// ============================================================================
// Fermatas (SMuFL U+E4C0-U+E4C9)
// ============================================================================

pub const FERMATA_ABOVE: char = '\u{E4C0}';
pub const FERMATA_BELOW: char = '\u{E4C1}';
pub const FERMATA_VERY_SHORT_ABOVE: char = '\u{E4C2}';
pub const FERMATA_VERY_SHORT_BELOW: char = '\u{E4C3}';
pub const FERMATA_SHORT_ABOVE: char = '\u{E4C4}';
pub const FERMATA_SHORT_BELOW: char = '\u{E4C5}';
pub const FERMATA_LONG_ABOVE: char = '\u{E4C6}';
pub const FERMATA_LONG_BELOW: char = '\u{E4C7}';
pub const FERMATA_VERY_LONG_ABOVE: char = '\u{E4C8}';
pub const FERMATA_VERY_LONG_BELOW: char = '\u{E4C9}';

// ============================================================================
// Accidentals (SMuFL U+E260-U+E26D)
// ============================================================================

pub const ACCIDENTAL_FLAT: char = '\u{E260}';
pub const ACCIDENTAL_NATURAL: char = '\u{E261}';
pub const ACCIDENTAL_SHARP: char = '\u{E262}';
pub const ACCIDENTAL_DOUBLE_SHARP: char = '\u{E263}';
pub const ACCIDENTAL_DOUBLE_FLAT: char = '\u{E264}';

/// Enclosure glyphs, shared by accidentals and ornaments
pub const PARENS_LEFT: char = '\u{E26A}';
pub const PARENS_RIGHT: char = '\u{E26B}';
pub const BRACKET_LEFT: char = '\u{E26C}';
pub const BRACKET_RIGHT: char = '\u{E26D}';

static GLYPHS_BY_NAME: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        ("fermataAbove", FERMATA_ABOVE),
        ("fermataBelow", FERMATA_BELOW),
        ("fermataVeryShortAbove", FERMATA_VERY_SHORT_ABOVE),
        ("fermataVeryShortBelow", FERMATA_VERY_SHORT_BELOW),
        ("fermataShortAbove", FERMATA_SHORT_ABOVE),
        ("fermataShortBelow", FERMATA_SHORT_BELOW),
        ("fermataLongAbove", FERMATA_LONG_ABOVE),
        ("fermataLongBelow", FERMATA_LONG_BELOW),
        ("fermataVeryLongAbove", FERMATA_VERY_LONG_ABOVE),
        ("fermataVeryLongBelow", FERMATA_VERY_LONG_BELOW),
        ("accidentalFlat", ACCIDENTAL_FLAT),
        ("accidentalNatural", ACCIDENTAL_NATURAL),
        ("accidentalSharp", ACCIDENTAL_SHARP),
        ("accidentalDoubleSharp", ACCIDENTAL_DOUBLE_SHARP),
        ("accidentalDoubleFlat", ACCIDENTAL_DOUBLE_FLAT),
        ("accidentalParensLeft", PARENS_LEFT),
        ("accidentalParensRight", PARENS_RIGHT),
        ("accidentalBracketLeft", BRACKET_LEFT),
        ("accidentalBracketRight", BRACKET_RIGHT),
    ])
});

/// Resolve a SMuFL glyph name (e.g. `fermataShortAbove`)
pub fn glyph_by_name(name: &str) -> Option<char> {
    GLYPHS_BY_NAME.get(name).copied()
}

/// Resolve a glyph number, accepting it only if the font provides the glyph
pub fn glyph_by_code(code: u32) -> Option<char> {
    let c = char::from_u32(code)?;
    GLYPHS_BY_NAME.values().any(|&g| g == c).then_some(c)
}

/// Export the glyph name table to JavaScript
///
/// Returns an array of `{ name, codepoint }` objects sorted by codepoint.
#[wasm_bindgen(js_name = getGlyphTable)]
pub fn get_glyph_table() -> JsValue {
    #[derive(serde::Serialize)]
    struct GlyphInfo {
        name: &'static str,
        codepoint: u32,
    }

    let mut glyphs: Vec<GlyphInfo> = GLYPHS_BY_NAME
        .iter()
        .map(|(name, c)| GlyphInfo {
            name,
            codepoint: *c as u32,
        })
        .collect();
    glyphs.sort_by_key(|g| g.codepoint);

    serde_wasm_bindgen::to_value(&glyphs).unwrap_or(JsValue::NULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_by_name() {
        assert_eq!(glyph_by_name("fermataLongBelow"), Some(FERMATA_LONG_BELOW));
        assert_eq!(glyph_by_name("accidentalSharp"), Some(ACCIDENTAL_SHARP));
        assert_eq!(glyph_by_name("noSuchGlyph"), None);
    }

    #[test]
    fn test_glyph_by_code_rejects_unknown() {
        assert_eq!(glyph_by_code(0xE4C2), Some(FERMATA_VERY_SHORT_ABOVE));
        assert_eq!(glyph_by_code(0xE000), None);
        assert_eq!(glyph_by_code(0xD800), None);
    }
}
