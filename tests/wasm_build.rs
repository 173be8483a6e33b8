//! WASM build test
//!
//! This module tests that the WASM module can be built and the JS entry points work.

use engraver_wasm::api::{fermata_glyph, key_accid_symbol, render_curves, render_curves_svg};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn layout() -> JsValue {
    let json = r#"{
        "systems": [{ "left": 0.0, "right": 500.0, "staves": [{ "id": "P1", "y": 50.0 }] }],
        "curves": [{
            "id": "sl1",
            "start": { "staff": "P1", "x": 10.0, "y": 36.0 },
            "end": { "staff": "P1", "x": 110.0, "y": 36.0 }
        }]
    }"#;
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn test_render_curves_with_default_options() {
    let list = render_curves(layout(), JsValue::UNDEFINED);
    assert!(list.is_ok());
}

#[wasm_bindgen_test]
fn test_render_curves_svg() {
    let svg = render_curves_svg(layout(), JsValue::NULL).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("data-owner=\"sl1\""));
}

#[wasm_bindgen_test]
fn test_invalid_options_are_rejected() {
    let options = js_sys::JSON::parse(r#"{ "unit": -1 }"#).unwrap();
    assert!(render_curves(layout(), options).is_err());
}

#[wasm_bindgen_test]
fn test_symbol_lookup() {
    let fermata = js_sys::JSON::parse(r#"{ "vis": { "form": "inv" } }"#).unwrap();
    assert!(fermata_glyph(fermata).is_ok());

    let accid = js_sys::JSON::parse(r#"{ "accidental": { "accid": "sharp" }, "enclosing": { "enclose": "brack" } }"#).unwrap();
    assert_eq!(key_accid_symbol(accid).unwrap(), "\u{E26C}\u{E262}\u{E26D}");
}
