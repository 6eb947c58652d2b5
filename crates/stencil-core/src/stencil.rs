//! Stencil shapes as solver strategies.
//!
//! Each shape supplies how it is sized ([`SizeStrategy`]) and how it is
//! pulled back inside the rotated image ([`FitStrategy`]). New shapes are
//! added by implementing both traits; the pipeline only sees
//! [`StencilStrategy`].

use serde::{Deserialize, Serialize};

use crate::constraints::{AspectRatio, SizeRestrictions};
use crate::fit::{fit_ellipse_to_image, fit_rectangle_to_image};
use crate::geometry::{Coordinates, ImageDescriptor, Point, Size};
use crate::size::{fitted_ellipse_size, fitted_rectangle_size};

/// Moves a stencil inside the rotated image.
pub trait FitStrategy {
    /// Translation that brings `coordinates` inside `image`.
    fn fit_to_image(&self, coordinates: &Coordinates, image: &ImageDescriptor) -> Point;
}

/// Finds the closest valid stencil size.
pub trait SizeStrategy {
    /// Nearest valid size to `request`, or `None` if nothing fits.
    fn fit_size(
        &self,
        request: Size,
        image: &ImageDescriptor,
        aspect_ratio: &AspectRatio,
        restrictions: &SizeRestrictions,
    ) -> Option<Size>;
}

/// A complete stencil shape.
pub trait StencilStrategy: FitStrategy + SizeStrategy {}

impl<T: FitStrategy + SizeStrategy> StencilStrategy for T {}

/// Axis-aligned rectangle, fitted by its four corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RectangleStencil;

impl FitStrategy for RectangleStencil {
    fn fit_to_image(&self, coordinates: &Coordinates, image: &ImageDescriptor) -> Point {
        fit_rectangle_to_image(coordinates, image)
    }
}

impl SizeStrategy for RectangleStencil {
    fn fit_size(
        &self,
        request: Size,
        image: &ImageDescriptor,
        aspect_ratio: &AspectRatio,
        restrictions: &SizeRestrictions,
    ) -> Option<Size> {
        fitted_rectangle_size(request, image, aspect_ratio, restrictions)
    }
}

/// Ellipse (or circle), fitted by its bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EllipseStencil;

impl FitStrategy for EllipseStencil {
    fn fit_to_image(&self, coordinates: &Coordinates, image: &ImageDescriptor) -> Point {
        fit_ellipse_to_image(coordinates, image)
    }
}

impl SizeStrategy for EllipseStencil {
    fn fit_size(
        &self,
        request: Size,
        image: &ImageDescriptor,
        aspect_ratio: &AspectRatio,
        restrictions: &SizeRestrictions,
    ) -> Option<Size> {
        fitted_ellipse_size(request, image, aspect_ratio, restrictions)
    }
}

/// Built-in stencil shapes, as named by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StencilType {
    #[default]
    Rectangle,
    #[serde(alias = "ellipse")]
    Circle,
}

impl StencilType {
    /// Strategy implementing this shape.
    pub fn strategy(self) -> &'static dyn StencilStrategy {
        match self {
            StencilType::Rectangle => &RectangleStencil,
            StencilType::Circle => &EllipseStencil,
        }
    }
}
