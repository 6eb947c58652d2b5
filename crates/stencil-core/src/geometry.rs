//! Geometry primitives shared by the solvers and the pipeline.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the rotated image's bounding box
//! - `left` grows to the right, `top` grows downwards
//! - Angles are in degrees, positive = clockwise on screen
//!
//! Every function here is pure and infallible. Inputs are assumed finite;
//! callers filter out `NaN`/`Infinity` produced by degenerate sizes.

use serde::{Deserialize, Serialize};

/// Relative tolerance used by the tolerant comparisons.
pub const TOLERANCE: f64 = 1e-3;

/// A position, or a translation vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

impl Point {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Vector from `other` to `self`.
    pub fn diff(self, other: Point) -> Point {
        Point::new(self.left - other.left, self.top - other.top)
    }

    /// Component-wise sum.
    pub fn add(self, other: Point) -> Point {
        Point::new(self.left + other.left, self.top + other.top)
    }
}

/// Width and height, both expected to be >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `width / height`.
    ///
    /// Infinite or `NaN` when the height is zero; such sizes are degenerate
    /// and never survive candidate validation.
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Uniformly scaled copy.
    pub fn scale(&self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

/// An axis-aligned box: position plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Coordinates {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a box of `size` whose top-left corner is `origin`.
    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.left, origin.top, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Same position, different size.
    pub fn with_size(&self, size: Size) -> Self {
        Self::from_parts(self.origin(), size)
    }

    pub fn ratio(&self) -> f64 {
        self.size().ratio()
    }

    /// Centroid of the box.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Translate by `offset`.
    pub fn apply_move(&self, offset: Point) -> Self {
        Self::new(
            self.left + offset.left,
            self.top + offset.top,
            self.width,
            self.height,
        )
    }

    /// Scale the size by `factor`, keeping the top-left corner fixed.
    pub fn apply_scale(&self, factor: f64) -> Self {
        self.with_size(self.size().scale(factor))
    }

    /// The four corners, clockwise from the top-left one.
    pub fn corners(&self) -> [Point; 4] {
        let right = self.left + self.width;
        let bottom = self.top + self.height;
        [
            Point::new(self.left, self.top),
            Point::new(right, self.top),
            Point::new(right, bottom),
            Point::new(self.left, bottom),
        ]
    }
}

/// Natural image size plus the rotation currently applied to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, positive = clockwise
    pub angle: f64,
}

impl ImageDescriptor {
    pub fn new(width: f64, height: f64, angle: f64) -> Self {
        Self {
            width,
            height,
            angle,
        }
    }

    /// Natural (unrotated) size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding box of the image once rotated by its angle.
    pub fn rotated_size(&self) -> Size {
        rotate_size(self.size(), self.angle)
    }

    /// Centre of the rotated bounding box, which is also the image centre.
    pub fn center(&self) -> Point {
        let size = self.rotated_size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }
}

/// Rotate `point` by `angle` degrees (clockwise on screen) about `center`.
///
/// `rotate_point(rotate_point(p, a, c), -a, c)` returns `p` up to rounding.
pub fn rotate_point(point: Point, angle: f64, center: Point) -> Point {
    let (sin, cos) = angle.to_radians().sin_cos();
    let dx = point.left - center.left;
    let dy = point.top - center.top;

    Point::new(
        dx * cos - dy * sin + center.left,
        dx * sin + dy * cos + center.top,
    )
}

/// Bounding box of `size` rotated by `angle` degrees about its own centre.
///
/// ```text
/// width'  = |w·cos θ| + |h·sin θ|
/// height' = |w·sin θ| + |h·cos θ|
/// ```
pub fn rotate_size(size: Size, angle: f64) -> Size {
    let (sin, cos) = angle.to_radians().sin_cos();

    Size::new(
        (size.width * cos).abs() + (size.height * sin).abs(),
        (size.width * sin).abs() + (size.height * cos).abs(),
    )
}

/// Euclidean distance between two sizes in (width, height) space.
pub fn size_distance(a: Size, b: Size) -> f64 {
    (a.width - b.width).hypot(a.height - b.height)
}

/// `a` and `b` are equal within [`TOLERANCE`], relative to their magnitude.
pub fn approximately_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().min(b.abs()).max(1.0);
    (a - b).abs() < TOLERANCE * scale
}

/// `a < b` and not approximately equal.
pub fn is_lower(a: f64, b: f64) -> bool {
    a < b && !approximately_equal(a, b)
}

/// `a > b` and not approximately equal.
pub fn is_greater(a: f64, b: f64) -> bool {
    a > b && !approximately_equal(a, b)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: rotating back by the negated angle restores the point.
        #[test]
        fn prop_rotation_round_trip(
            left in -5000.0f64..5000.0,
            top in -5000.0f64..5000.0,
            cx in -1000.0f64..1000.0,
            cy in -1000.0f64..1000.0,
            angle in -720.0f64..720.0,
        ) {
            let p = Point::new(left, top);
            let center = Point::new(cx, cy);
            let back = rotate_point(rotate_point(p, angle, center), -angle, center);

            prop_assert!((back.left - p.left).abs() < 1e-6);
            prop_assert!((back.top - p.top).abs() < 1e-6);
        }

        /// Property: rotation preserves distance to the centre.
        #[test]
        fn prop_rotation_preserves_radius(
            left in -1000.0f64..1000.0,
            top in -1000.0f64..1000.0,
            angle in -360.0f64..360.0,
        ) {
            let p = Point::new(left, top);
            let r = rotate_point(p, angle, Point::default());

            prop_assert!((left.hypot(top) - r.left.hypot(r.top)).abs() < 1e-6);
        }

        /// Property: the rotated bounding box always contains the original size.
        #[test]
        fn prop_rotated_size_never_smaller_than_diagonal_projection(
            w in 1.0f64..4000.0,
            h in 1.0f64..4000.0,
            angle in -360.0f64..360.0,
        ) {
            let s = rotate_size(Size::new(w, h), angle);
            let shorter = w.min(h);

            prop_assert!(s.width >= shorter - 1e-6);
            prop_assert!(s.height >= shorter - 1e-6);
            prop_assert!(s.width <= w.hypot(h) + 1e-6);
            prop_assert!(s.height <= w.hypot(h) + 1e-6);
        }
    }
}
