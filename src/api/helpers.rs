//! Shared helpers for WASM API operations

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EngravingOptions;

/// Deserialize a value from JavaScript, logging and converting failures
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(error_context, e))
}

/// Serialize a value for JavaScript, logging and converting failures
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(error_context, e))
}

/// Engraving options from JavaScript; missing options mean defaults
pub fn options_from_js(value: JsValue) -> Result<EngravingOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EngravingOptions::default());
    }
    let options: EngravingOptions = deserialize(value, "Invalid engraving options")?;
    options
        .validate()
        .map_err(|e| js_error("Invalid engraving options", e))?;
    Ok(options)
}

/// Log an error and turn it into a JS string value
pub fn js_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    let msg = format!("{}: {}", context, error);
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}
