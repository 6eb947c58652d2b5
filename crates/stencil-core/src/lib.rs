//! Stencil Core - Geometric reconciliation engine for image croppers
//!
//! This crate keeps a crop stencil valid while the user rotates, resizes or
//! re-frames an image: correctly sized, inside the rotated image and framed
//! by the viewport.
//!
//! # Module Structure
//!
//! - `geometry` - Points, sizes, boxes, rotation and tolerant comparisons
//! - `constraints` - Aspect ratio ranges and size restrictions
//! - `fit` - Translation that pulls a stencil back inside the rotated image
//! - `size` - Closest valid stencil size for a requested one
//! - `stencil` - Stencil shapes as size/fit strategies
//! - `settings` - Host-supplied cropper configuration
//! - `state` - Cropper state and its defaults
//! - `pipeline` - The reconciliation pipeline and state transitions
//! - `navigation` - Rotation dial arithmetic
//! - `error` - Error types

pub mod constraints;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod navigation;
pub mod pipeline;
pub mod settings;
pub mod size;
pub mod state;
pub mod stencil;

pub use constraints::{image_to_size_restrictions, AspectRatio, SizeRestrictions};
pub use error::{SettingsError, StateError};
pub use fit::{fit_ellipse_to_image, fit_polygon_to_image, fit_rectangle_to_image};
pub use geometry::{rotate_point, rotate_size, Coordinates, ImageDescriptor, Point, Size};
pub use navigation::{bar_values, RotationSteps, MAX_BAR_VALUES};
pub use pipeline::{
    flip_image, post_process, post_process_with, rotate_image, set_boundary, set_coordinates,
    set_visible_area, Action,
};
pub use settings::CropperSettings;
pub use size::{approximate_size, fitted_ellipse_size, fitted_rectangle_size};
pub use state::{default_size, default_visible_area, CropperState, Flip, Transforms};
pub use stencil::{
    EllipseStencil, FitStrategy, RectangleStencil, SizeStrategy, StencilStrategy, StencilType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_rotate_workflow() {
        let settings = CropperSettings::new().with_aspect_ratio(16.0 / 9.0);
        settings.validate().unwrap();

        let state = CropperState::new(Size::new(4000.0, 3000.0), Size::new(800.0, 600.0)).unwrap();
        let state = post_process(&state, &settings, Action::Create);
        assert!((state.coordinates.ratio() - 16.0 / 9.0).abs() < 1e-6);
        assert!((state.coordinates.width - 4000.0).abs() < 1e-6);

        let state = rotate_image(&state, &settings, 10.0);
        assert!(state.coordinates.width < 4000.0);
        assert!(settings.aspect_ratio().contains(state.coordinates.ratio()));

        let steps = RotationSteps::from_angle(state.transforms.rotate, 0);
        let state = rotate_image(&state, &settings, steps.rotate_right_step());
        assert!((state.transforms.rotate - 90.0).abs() < 1e-9);
    }
}
