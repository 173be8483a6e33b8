//! Curve rendering and symbol lookup entry points

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, js_error, options_from_js, serialize};
use crate::diagnostics;
use crate::models::{Fermata, KeyAccid, ScoreLayout, VerticalAlignment};
use crate::renderers::layout_engine::LayoutEngine;

/// Lay out and draw every curve of a score layout
///
/// Runs the measurement pass and the final pass and returns the display list
/// (`{ commands: [...] }`).
#[wasm_bindgen(js_name = renderCurves)]
pub fn render_curves(layout_js: JsValue, options_js: JsValue) -> Result<JsValue, JsValue> {
    let layout: ScoreLayout = deserialize(layout_js, "Invalid score layout")?;
    let options = options_from_js(options_js)?;

    let mut engine = LayoutEngine::new(options);
    let list = engine
        .render(&layout)
        .map_err(|e| js_error("Curve rendering failed", e))?;

    log::info!("renderCurves: {} curves, {} commands", layout.curves.len(), list.len());
    serialize(&list, "Failed to serialize display list")
}

/// Lay out every curve and return a standalone SVG document
#[wasm_bindgen(js_name = renderCurvesSvg)]
pub fn render_curves_svg(layout_js: JsValue, options_js: JsValue) -> Result<String, JsValue> {
    let layout: ScoreLayout = deserialize(layout_js, "Invalid score layout")?;
    let options = options_from_js(options_js)?;

    let mut engine = LayoutEngine::new(options);
    engine
        .measure(&layout)
        .map_err(|e| js_error("Curve measurement failed", e))?;
    engine
        .render_svg(&layout)
        .map_err(|e| js_error("SVG rendering failed", e))
}

/// Diagnostic marks for every curve of a score layout
#[wasm_bindgen(js_name = analyzeCurves)]
pub fn analyze_curves(layout_js: JsValue, options_js: JsValue) -> Result<js_sys::Array, JsValue> {
    let layout: ScoreLayout = deserialize(layout_js, "Invalid score layout")?;
    let options = options_from_js(options_js)?;

    let diagnostics = diagnostics::curves::analyze_curves(&layout, &options);
    let marks = js_sys::Array::new();
    for mark in &diagnostics.marks {
        marks.push(&serialize(mark, "Failed to serialize diagnostic")?);
    }
    Ok(marks)
}

#[derive(Serialize)]
struct FermataGlyph {
    code: u32,
    glyph: String,
    alignment: VerticalAlignment,
    enclosing: Option<(u32, u32)>,
}

/// SMuFL glyph, alignment and enclosing glyphs for a fermata
#[wasm_bindgen(js_name = fermataGlyph)]
pub fn fermata_glyph(fermata_js: JsValue) -> Result<JsValue, JsValue> {
    let fermata: Fermata = deserialize(fermata_js, "Invalid fermata")?;
    let code = fermata.glyph();
    let result = FermataGlyph {
        code: u32::from(code),
        glyph: code.to_string(),
        alignment: Fermata::vertical_alignment(code),
        enclosing: fermata
            .enclosing_glyphs()
            .map(|(left, right)| (u32::from(left), u32::from(right))),
    };
    serialize(&result, "Failed to serialize fermata glyph")
}

/// SMuFL string for a key signature accidental
#[wasm_bindgen(js_name = keyAccidSymbol)]
pub fn key_accid_symbol(key_accid_js: JsValue) -> Result<String, JsValue> {
    let key_accid: KeyAccid = deserialize(key_accid_js, "Invalid key accidental")?;
    Ok(key_accid.symbol_str())
}
