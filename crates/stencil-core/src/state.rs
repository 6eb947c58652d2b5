//! Cropper state: the immutable snapshot the pipeline reads and produces.
//!
//! A state exists only while an image is loaded. It is seeded by
//! [`CropperState::new`] from the image and boundary sizes and afterwards
//! replaced wholesale by every pipeline call; nothing mutates a state that
//! has been handed out.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::geometry::{Coordinates, ImageDescriptor, Size};

/// Mirror flags applied to the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Image transforms that do not change the stored coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transforms {
    /// Rotation in degrees, positive = clockwise
    pub rotate: f64,
    pub flip: Flip,
}

/// Complete geometric state of a cropper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropperState {
    /// Natural image size
    pub image_size: Size,
    /// On-screen viewport size
    pub boundary: Size,
    /// Stencil box
    pub coordinates: Coordinates,
    /// Part of the image mapped onto the boundary
    pub visible_area: Coordinates,
    #[serde(default)]
    pub transforms: Transforms,
}

impl CropperState {
    /// Seed a state for a freshly loaded image.
    ///
    /// The stencil covers the whole image and the visible area fits the
    /// image to the boundary's aspect ratio. Run the pipeline with
    /// [`Action::Create`](crate::Action::Create) afterwards to apply settings.
    ///
    /// # Errors
    ///
    /// [`StateError`] when either size is zero, negative or not finite.
    pub fn new(image_size: Size, boundary: Size) -> Result<Self, StateError> {
        if !image_size.is_positive() {
            return Err(StateError::InvalidImageSize {
                width: image_size.width,
                height: image_size.height,
            });
        }
        check_boundary(boundary)?;

        let visible_area = default_visible_area(image_size, boundary);
        let size = default_size(image_size);
        let center = visible_area.center();

        Ok(Self {
            image_size,
            boundary,
            coordinates: Coordinates::new(
                center.left - size.width / 2.0,
                center.top - size.height / 2.0,
                size.width,
                size.height,
            ),
            visible_area,
            transforms: Transforms::default(),
        })
    }

    /// Image size together with the current rotation.
    pub fn image(&self) -> ImageDescriptor {
        ImageDescriptor::new(
            self.image_size.width,
            self.image_size.height,
            self.transforms.rotate,
        )
    }
}

pub(crate) fn check_boundary(boundary: Size) -> Result<(), StateError> {
    if boundary.is_positive() {
        Ok(())
    } else {
        Err(StateError::InvalidBoundary {
            width: boundary.width,
            height: boundary.height,
        })
    }
}

/// Initial stencil size: the whole image.
pub fn default_size(image_size: Size) -> Size {
    image_size
}

/// Initial visible area: the image fitted to the boundary's aspect ratio.
///
/// An image relatively wider than the boundary spans its full width and is
/// centred vertically; otherwise it spans its full height and is centred
/// horizontally.
pub fn default_visible_area(image_size: Size, boundary: Size) -> Coordinates {
    let boundary_ratio = boundary.ratio();

    if image_size.ratio() > boundary_ratio {
        let width = image_size.width;
        let height = width / boundary_ratio;
        Coordinates::new(0.0, image_size.height / 2.0 - height / 2.0, width, height)
    } else {
        let height = image_size.height;
        let width = boundary_ratio * height;
        Coordinates::new(image_size.width / 2.0 - width / 2.0, 0.0, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_area_wide_image() {
        let area = default_visible_area(Size::new(2000.0, 1000.0), Size::new(400.0, 400.0));
        assert_eq!(area, Coordinates::new(0.0, -500.0, 2000.0, 2000.0));
    }

    #[test]
    fn test_visible_area_tall_image() {
        let area = default_visible_area(Size::new(500.0, 1000.0), Size::new(800.0, 400.0));
        assert_eq!(area, Coordinates::new(-750.0, 0.0, 2000.0, 1000.0));
    }

    #[test]
    fn test_visible_area_matches_boundary_ratio() {
        let boundary = Size::new(640.0, 480.0);
        let area = default_visible_area(Size::new(1234.0, 987.0), boundary);
        assert!((area.ratio() - boundary.ratio()).abs() < 1e-9);
    }

    #[test]
    fn test_new_state_covers_image() {
        let state = CropperState::new(Size::new(1000.0, 500.0), Size::new(400.0, 400.0)).unwrap();

        assert_eq!(state.coordinates, Coordinates::new(0.0, 0.0, 1000.0, 500.0));
        assert_eq!(state.transforms, Transforms::default());
        assert_eq!(state.image(), ImageDescriptor::new(1000.0, 500.0, 0.0));
    }

    #[test]
    fn test_new_state_rejects_degenerate_sizes() {
        assert!(matches!(
            CropperState::new(Size::new(0.0, 500.0), Size::new(400.0, 400.0)),
            Err(StateError::InvalidImageSize { .. })
        ));
        assert!(matches!(
            CropperState::new(Size::new(100.0, 100.0), Size::new(400.0, f64::NAN)),
            Err(StateError::InvalidBoundary { .. })
        ));
    }

    #[test]
    fn test_state_serde_shape() {
        let state = CropperState::new(Size::new(100.0, 50.0), Size::new(100.0, 50.0)).unwrap();
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["imageSize"]["width"], 100.0);
        assert_eq!(json["visibleArea"]["height"], 50.0);
        assert_eq!(json["transforms"]["flip"]["horizontal"], false);

        let back: CropperState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
