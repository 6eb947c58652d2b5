//! Reconciliation pipeline: bring a state back in line with its settings.
//!
//! Runs after every discrete action that can leave the stencil invalid. In
//! order:
//!
//! 1. Size the stencil with the shape's [`SizeStrategy`](crate::SizeStrategy),
//!    using the current stencil size as the request
//! 2. Re-centre the resized stencil on its previous centre
//! 3. Pull it back inside the rotated image with the shape's
//!    [`FitStrategy`](crate::FitStrategy)
//! 4. Scale the visible area so the stencil fills the boundary, then centre
//!    the stencil along the axis the boundary ratio leaves free
//!
//! Every step is a pure function of the input state, settings and action.
//! If no valid size exists the input state is returned unchanged; a caller
//! never sees a partially applied update.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::StateError;
use crate::geometry::{rotate_size, Coordinates, Point, Size};
use crate::settings::CropperSettings;
use crate::state::{check_boundary, CropperState};
use crate::stencil::StencilStrategy;

/// What triggered a pipeline run.
///
/// Only the reconciling actions are processed; continuous interactions
/// (dragging, resizing, flipping) pass through untouched and are reconciled
/// once the interaction ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// State seeded for a newly loaded image
    Create,
    /// Settings changed (aspect ratio, stencil shape, bounds)
    Reconcile,
    InteractionEnd,
    Rotate,
    Zoom,
    SetBoundary,
    SetVisibleArea,
    SetCoordinates,
    Move,
    Resize,
    TransformImage,
    Flip,
    /// Any action name this engine does not know
    #[serde(other)]
    Other,
}

impl Action {
    /// Whether this action runs the pipeline.
    pub fn reconciles(self) -> bool {
        match self {
            Action::Create
            | Action::Reconcile
            | Action::InteractionEnd
            | Action::Rotate
            | Action::Zoom
            | Action::SetBoundary
            | Action::SetVisibleArea
            | Action::SetCoordinates => true,
            Action::Move
            | Action::Resize
            | Action::TransformImage
            | Action::Flip
            | Action::Other => false,
        }
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    /// Parse a host action name. Unknown names become [`Action::Other`].
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            "create" => Action::Create,
            "reconcile" => Action::Reconcile,
            "interactionEnd" => Action::InteractionEnd,
            "rotate" => Action::Rotate,
            "zoom" => Action::Zoom,
            "setBoundary" => Action::SetBoundary,
            "setVisibleArea" => Action::SetVisibleArea,
            "setCoordinates" => Action::SetCoordinates,
            "move" => Action::Move,
            "resize" => Action::Resize,
            "transformImage" => Action::TransformImage,
            "flip" => Action::Flip,
            _ => Action::Other,
        })
    }
}

/// Reconcile `state` using the stencil shape named in `settings`.
pub fn post_process(state: &CropperState, settings: &CropperSettings, action: Action) -> CropperState {
    post_process_with(state, settings, action, settings.stencil_type.strategy())
}

/// Reconcile `state` with an explicit stencil strategy.
///
/// # Arguments
///
/// * `state` - Current state; never modified
/// * `settings` - Aspect ratio and size bounds
/// * `action` - What triggered the run; non-reconciling actions return a copy
/// * `stencil` - Sizing and fitting behaviour of the stencil shape
///
/// # Returns
///
/// The reconciled state, or a copy of `state` when the action does not
/// reconcile or no valid stencil size exists.
pub fn post_process_with<S>(
    state: &CropperState,
    settings: &CropperSettings,
    action: Action,
    stencil: &S,
) -> CropperState
where
    S: StencilStrategy + ?Sized,
{
    if !action.reconciles() {
        trace!(?action, "action passes through");
        return state.clone();
    }

    let image = state.image();
    let Some(size) = stencil.fit_size(
        state.coordinates.size(),
        &image,
        &settings.aspect_ratio(),
        &settings.size_restrictions(),
    ) else {
        debug!(?action, "no valid stencil size, keeping previous state");
        return state.clone();
    };

    // Keep the focal point across the size change
    let previous_center = state.coordinates.center();
    let resized = state.coordinates.with_size(size);
    let coordinates = resized.apply_move(previous_center.diff(resized.center()));

    let coordinates = coordinates.apply_move(stencil.fit_to_image(&coordinates, &image));

    let Some(visible_area) = fit_visible_area(&coordinates, &state.visible_area, state.boundary)
    else {
        debug!(?action, "degenerate visible area, keeping previous state");
        return state.clone();
    };

    CropperState {
        coordinates,
        visible_area,
        ..state.clone()
    }
}

/// Scale and align the visible area so the stencil fills the boundary.
fn fit_visible_area(
    coordinates: &Coordinates,
    visible_area: &Coordinates,
    boundary: Size,
) -> Option<Coordinates> {
    let ratio = coordinates.ratio();
    let height_limited = boundary.ratio() > ratio;

    // Largest box of the stencil's ratio inside the boundary
    let stencil = if height_limited {
        Size::new(boundary.height * ratio, boundary.height)
    } else {
        Size::new(boundary.width, boundary.width / ratio)
    };

    let scale = (coordinates.width * boundary.width) / (visible_area.width * stencil.width);
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }

    let mut area = visible_area.apply_scale(scale);
    if height_limited {
        area.top = coordinates.top;
        area.left = coordinates.left - area.width / 2.0 + coordinates.width / 2.0;
    } else {
        area.left = coordinates.left;
        area.top = coordinates.top - area.height / 2.0 + coordinates.height / 2.0;
    }
    Some(area)
}

/// Rotate the image by `delta` degrees and reconcile.
///
/// The rotated bounding box changes size with the angle; the stencil and
/// visible area are shifted so they keep their place relative to the image
/// centre.
pub fn rotate_image(state: &CropperState, settings: &CropperSettings, delta: f64) -> CropperState {
    let previous = rotate_size(state.image_size, state.transforms.rotate);
    let angle = state.transforms.rotate + delta;
    let current = rotate_size(state.image_size, angle);
    let shift = Point::new(
        (current.width - previous.width) / 2.0,
        (current.height - previous.height) / 2.0,
    );

    let mut next = state.clone();
    next.transforms.rotate = angle;
    next.coordinates = state.coordinates.apply_move(shift);
    next.visible_area = state.visible_area.apply_move(shift);

    post_process(&next, settings, Action::Rotate)
}

/// Toggle the mirror flags. Geometry is unaffected, so nothing is reconciled.
pub fn flip_image(state: &CropperState, horizontal: bool, vertical: bool) -> CropperState {
    let mut next = state.clone();
    next.transforms.flip.horizontal ^= horizontal;
    next.transforms.flip.vertical ^= vertical;
    next
}

/// Replace the stencil box and reconcile.
pub fn set_coordinates(
    state: &CropperState,
    settings: &CropperSettings,
    coordinates: Coordinates,
) -> CropperState {
    let next = CropperState {
        coordinates,
        ..state.clone()
    };
    post_process(&next, settings, Action::SetCoordinates)
}

/// Replace the visible area and reconcile.
///
/// # Errors
///
/// [`StateError::InvalidVisibleArea`] for a visible area without area.
pub fn set_visible_area(
    state: &CropperState,
    settings: &CropperSettings,
    visible_area: Coordinates,
) -> Result<CropperState, StateError> {
    if !visible_area.size().is_positive() {
        return Err(StateError::InvalidVisibleArea {
            width: visible_area.width,
            height: visible_area.height,
        });
    }
    let next = CropperState {
        visible_area,
        ..state.clone()
    };
    Ok(post_process(&next, settings, Action::SetVisibleArea))
}

/// Resize the viewport and reconcile.
///
/// The visible area keeps its centre and width and takes the new boundary's
/// aspect ratio.
///
/// # Errors
///
/// [`StateError::InvalidBoundary`] for a boundary without area.
pub fn set_boundary(
    state: &CropperState,
    settings: &CropperSettings,
    boundary: Size,
) -> Result<CropperState, StateError> {
    check_boundary(boundary)?;

    let center = state.visible_area.center();
    let width = state.visible_area.width;
    let height = width / boundary.ratio();

    let next = CropperState {
        boundary,
        visible_area: Coordinates::new(
            center.left - width / 2.0,
            center.top - height / 2.0,
            width,
            height,
        ),
        ..state.clone()
    };
    Ok(post_process(&next, settings, Action::SetBoundary))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
