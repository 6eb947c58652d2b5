//! Cropper state bindings.
//!
//! The host owns the state object. Each call takes the current state and
//! settings as plain JS objects and returns the next state; nothing is kept
//! on the WASM side between calls.

use stencil_core::geometry::Size;
use stencil_core::pipeline::{self, Action};
use stencil_core::state::{self, CropperState};
use stencil_core::{CropperSettings, StateError};
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::types::{from_js, resolve_action, settings_from_js, to_js};

/// Seed a state for a loaded image and apply the settings to it.
pub(crate) fn seed_state(
    image_size: Size,
    boundary: Size,
    settings: &CropperSettings,
) -> Result<CropperState, StateError> {
    let state = CropperState::new(image_size, boundary)?;
    Ok(pipeline::post_process(&state, settings, Action::Create))
}

/// Create the initial state for a freshly loaded image.
///
/// # Arguments
///
/// * `image_width`, `image_height` - Natural image size in pixels
/// * `boundary_width`, `boundary_height` - Viewport size
/// * `settings` - Cropper settings object, or `undefined` for defaults
///
/// # Example (TypeScript)
///
/// ```typescript
/// const state = create_state(4000, 3000, 800, 600, { aspectRatio: 16 / 9 });
/// ```
#[wasm_bindgen]
pub fn create_state(
    image_width: f64,
    image_height: f64,
    boundary_width: f64,
    boundary_height: f64,
    settings: JsValue,
) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let state = seed_state(
        Size::new(image_width, image_height),
        Size::new(boundary_width, boundary_height),
        &settings,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&state)
}

/// Run the reconciliation pipeline for `action`.
///
/// Unknown action names are logged to the console and leave the state
/// unchanged.
#[wasm_bindgen]
pub fn post_process(state: JsValue, settings: JsValue, action: &str) -> Result<JsValue, JsValue> {
    let state: CropperState = from_js(state, "state")?;
    let settings = settings_from_js(settings)?;

    let action = resolve_action(action).unwrap_or_else(|| {
        console::warn_1(&format!("Unknown cropper action '{}', state left unchanged", action).into());
        Action::Other
    });

    to_js(&pipeline::post_process(&state, &settings, action))
}

/// Rotate the image by `delta` degrees (clockwise) and reconcile.
#[wasm_bindgen]
pub fn rotate_image(state: JsValue, settings: JsValue, delta: f64) -> Result<JsValue, JsValue> {
    let state: CropperState = from_js(state, "state")?;
    let settings = settings_from_js(settings)?;
    to_js(&pipeline::rotate_image(&state, &settings, delta))
}

/// Toggle the image mirror flags.
#[wasm_bindgen]
pub fn flip_image(state: JsValue, horizontal: bool, vertical: bool) -> Result<JsValue, JsValue> {
    let state: CropperState = from_js(state, "state")?;
    to_js(&pipeline::flip_image(&state, horizontal, vertical))
}

/// Initial visible area for an image shown in a boundary.
#[wasm_bindgen]
pub fn default_visible_area(
    image_width: f64,
    image_height: f64,
    boundary_width: f64,
    boundary_height: f64,
) -> Result<JsValue, JsValue> {
    to_js(&state::default_visible_area(
        Size::new(image_width, image_height),
        Size::new(boundary_width, boundary_height),
    ))
}
