//! Stencil WASM - WebAssembly bindings for the stencil cropper engine
//!
//! This crate exposes the stencil-core reconciliation pipeline and solvers
//! to JavaScript/TypeScript hosts. States and settings travel as plain JS
//! objects with camelCase fields.
//!
//! # Module Structure
//!
//! - `state` - State creation and transitions (`create_state`, `post_process`, ...)
//! - `solver` - Direct solver access (`fitted_size`, `fit_to_image`, `rotation_steps`)
//! - `types` - JS conversions and wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { create_state, post_process, rotate_image } from '@stencil/wasm';
//!
//! await init();
//!
//! const settings = { aspectRatio: 1, stencilType: 'circle' };
//! let state = create_state(image.naturalWidth, image.naturalHeight, 800, 600, settings);
//! state = rotate_image(state, settings, 15);
//! state = post_process({ ...state, coordinates: dragged }, settings, 'interactionEnd');
//! ```

use wasm_bindgen::prelude::*;

mod solver;
mod state;
mod types;

pub use solver::{fit_to_image, fitted_size, rotation_steps};
pub use state::{create_state, default_visible_area, flip_image, post_process, rotate_image};
pub use types::JsRotationSteps;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
