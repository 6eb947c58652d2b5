//! Conversions between JavaScript values and the core types.
//!
//! Plain JS objects cross the boundary through serde_wasm_bindgen using the
//! core types' camelCase field names. Every failure becomes a JS string
//! error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use stencil_core::navigation::RotationSteps;
use stencil_core::pipeline::Action;
use stencil_core::CropperSettings;
use wasm_bindgen::prelude::*;

/// Deserialize a JS object, naming the argument in the error.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Serialize a value into a plain JS object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Read and validate cropper settings. `null` and `undefined` mean defaults.
pub(crate) fn settings_from_js(value: JsValue) -> Result<CropperSettings, JsValue> {
    let settings = if value.is_undefined() || value.is_null() {
        CropperSettings::default()
    } else {
        from_js(value, "settings")?
    };
    settings
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(settings)
}

/// Map a host action name, or `None` if the name is not recognised.
pub(crate) fn resolve_action(name: &str) -> Option<Action> {
    match name.parse::<Action>() {
        Ok(Action::Other) if name != "other" => None,
        Ok(action) => Some(action),
        Err(never) => match never {},
    }
}

/// Rotation dial state for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsRotationSteps {
    steps: RotationSteps,
}

#[wasm_bindgen]
impl JsRotationSteps {
    /// Whole quarter turns in the angle
    #[wasm_bindgen(getter)]
    pub fn quarter(&self) -> u32 {
        self.steps.quarter
    }

    /// Residual angle in degrees, within [-45, 45]
    #[wasm_bindgen(getter)]
    pub fn adjustment(&self) -> f64 {
        self.steps.adjustment
    }

    /// Delta that snaps to the previous quarter turn
    #[wasm_bindgen(getter)]
    pub fn rotate_left_step(&self) -> f64 {
        self.steps.rotate_left_step()
    }

    /// Delta that snaps to the next quarter turn
    #[wasm_bindgen(getter)]
    pub fn rotate_right_step(&self) -> f64 {
        self.steps.rotate_right_step()
    }
}

impl From<RotationSteps> for JsRotationSteps {
    fn from(steps: RotationSteps) -> Self {
        Self { steps }
    }
}
