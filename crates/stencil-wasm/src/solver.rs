//! Direct access to the solvers, for hosts that drive interactions
//! themselves (live previews while dragging, rotation dial).

use stencil_core::geometry::{Coordinates, ImageDescriptor, Point, Size};
use stencil_core::navigation::RotationSteps;
use stencil_core::CropperSettings;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, settings_from_js, to_js, JsRotationSteps};

/// Closest valid stencil size for `request` under `settings`.
pub(crate) fn solve_size(
    request: Size,
    image: &ImageDescriptor,
    settings: &CropperSettings,
) -> Option<Size> {
    settings.stencil_type.strategy().fit_size(
        request,
        image,
        &settings.aspect_ratio(),
        &settings.size_restrictions(),
    )
}

/// Translation that moves `coordinates` inside the rotated image.
pub(crate) fn solve_fit(
    coordinates: &Coordinates,
    image: &ImageDescriptor,
    settings: &CropperSettings,
) -> Point {
    settings
        .stencil_type
        .strategy()
        .fit_to_image(coordinates, image)
}

/// Closest valid stencil size for a requested one.
///
/// # Arguments
///
/// * `width`, `height` - Requested stencil size
/// * `image` - `{ width, height, angle }` of the rotated image
/// * `settings` - Cropper settings object, or `undefined` for defaults
///
/// # Returns
///
/// `{ width, height }`, or `undefined` when no valid size exists.
#[wasm_bindgen]
pub fn fitted_size(
    width: f64,
    height: f64,
    image: JsValue,
    settings: JsValue,
) -> Result<JsValue, JsValue> {
    let image: ImageDescriptor = from_js(image, "image")?;
    let settings = settings_from_js(settings)?;
    to_js(&solve_size(Size::new(width, height), &image, &settings))
}

/// Offset `{ left, top }` that pulls a stencil back inside the rotated image.
#[wasm_bindgen]
pub fn fit_to_image(
    coordinates: JsValue,
    image: JsValue,
    settings: JsValue,
) -> Result<JsValue, JsValue> {
    let coordinates: Coordinates = from_js(coordinates, "coordinates")?;
    let image: ImageDescriptor = from_js(image, "image")?;
    let settings = settings_from_js(settings)?;
    to_js(&solve_fit(&coordinates, &image, &settings))
}

/// Split an absolute angle into quarter turns and an adjustment.
#[wasm_bindgen]
pub fn rotation_steps(angle: f64, previous_quarter: u32) -> JsRotationSteps {
    RotationSteps::from_angle(angle, previous_quarter).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::StencilType;

    #[test]
    fn test_solve_size_uses_stencil_type() {
        let image = ImageDescriptor::new(1000.0, 500.0, 45.0);
        let request = Size::new(1000.0, 500.0);

        let rectangle = solve_size(request, &image, &CropperSettings::new()).unwrap();
        let circle = solve_size(
            request,
            &image,
            &CropperSettings::new().with_stencil_type(StencilType::Circle),
        )
        .unwrap();

        assert!(rectangle.width < circle.width);
        assert_eq!(circle, request);
    }

    #[test]
    fn test_solve_fit_moves_inside() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let offset = solve_fit(
            &Coordinates::new(900.0, -20.0, 200.0, 200.0),
            &image,
            &CropperSettings::new(),
        );
        assert_eq!(offset, Point::new(-100.0, 20.0));
    }

    #[test]
    fn test_rotation_steps_export() {
        let steps = rotation_steps(-100.0, 0);
        assert_eq!(steps.quarter(), 1);
        assert_eq!(steps.adjustment(), -10.0);
        assert_eq!(steps.rotate_right_step(), 10.0);
    }
}
