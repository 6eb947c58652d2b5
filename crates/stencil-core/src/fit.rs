//! Image-fit solver: pull a stencil back inside the rotated image.
//!
//! # Algorithm
//!
//! The stencil is axis-aligned on screen while the image is rotated, so the
//! check happens in the image's own frame:
//!
//! 1. Rotate the shape's corners by `-angle` about the image centre
//! 2. Measure how far the corners poke past each of the four image edges
//! 3. Turn the horizontal and vertical corrections back into screen space
//!    by rotating them with `+angle`, and sum them
//!
//! The stored coordinates are never rotated; only the query points are.

use crate::geometry::{rotate_point, Coordinates, ImageDescriptor, Point};

/// Penetration of a set of points past the image edges, in the image frame.
///
/// Each field is the correction needed for that edge, or `None` when no
/// point crosses it. Near-edge corrections are positive, far-edge ones
/// negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Intersections {
    left: Option<f64>,
    right: Option<f64>,
    top: Option<f64>,
    bottom: Option<f64>,
}

impl Intersections {
    fn measure(points: &[Point], image: &ImageDescriptor) -> Self {
        let center = image.center();
        let left_edge = center.left - image.width / 2.0;
        let top_edge = center.top - image.height / 2.0;
        let right_edge = left_edge + image.width;
        let bottom_edge = top_edge + image.height;

        let mut result = Self::default();
        for point in points {
            if point.left < left_edge {
                result.left = Some(f64_max(result.left, left_edge - point.left));
            }
            if point.left > right_edge {
                result.right = Some(f64_min(result.right, right_edge - point.left));
            }
            if point.top < top_edge {
                result.top = Some(f64_max(result.top, top_edge - point.top));
            }
            if point.top > bottom_edge {
                result.bottom = Some(f64_min(result.bottom, bottom_edge - point.top));
            }
        }
        result
    }

    /// Horizontal and vertical correction in the image frame.
    ///
    /// When a shape overflows both edges of an axis the near edge (left,
    /// top) wins, so the result is deterministic even if the shape cannot
    /// fit at all.
    fn correction(&self) -> (f64, f64) {
        (
            self.left.or(self.right).unwrap_or(0.0),
            self.top.or(self.bottom).unwrap_or(0.0),
        )
    }
}

fn f64_max(current: Option<f64>, value: f64) -> f64 {
    current.map_or(value, |c| c.max(value))
}

fn f64_min(current: Option<f64>, value: f64) -> f64 {
    current.map_or(value, |c| c.min(value))
}

/// Translation that moves `points` (already in the image frame) inside the
/// image, expressed in screen space.
pub fn fit_polygon_to_image(points: &[Point], image: &ImageDescriptor) -> Point {
    let (horizontal, vertical) = Intersections::measure(points, image).correction();
    let origin = Point::default();

    let horizontal = rotate_point(Point::new(horizontal, 0.0), image.angle, origin);
    let vertical = rotate_point(Point::new(0.0, vertical), image.angle, origin);

    horizontal.add(vertical)
}

/// Translation that moves a rectangular stencil inside the rotated image.
///
/// Applying the result with [`Coordinates::apply_move`] leaves every corner
/// on or inside the image edges, provided the rectangle fits at all.
pub fn fit_rectangle_to_image(coordinates: &Coordinates, image: &ImageDescriptor) -> Point {
    let center = image.center();
    let points = coordinates
        .corners()
        .map(|corner| rotate_point(corner, -image.angle, center));

    fit_polygon_to_image(&points, image)
}

/// Translation that moves an elliptical stencil inside the rotated image.
///
/// Only the ellipse centre is rotated into the image frame; the ellipse is
/// then approximated by a box of its own width and height aligned with the
/// image edges.
pub fn fit_ellipse_to_image(coordinates: &Coordinates, image: &ImageDescriptor) -> Point {
    let center = rotate_point(coordinates.center(), -image.angle, image.center());
    let half_width = coordinates.width / 2.0;
    let half_height = coordinates.height / 2.0;

    let points = [
        Point::new(center.left - half_width, center.top - half_height),
        Point::new(center.left + half_width, center.top - half_height),
        Point::new(center.left + half_width, center.top + half_height),
        Point::new(center.left - half_width, center.top + half_height),
    ];

    fit_polygon_to_image(&points, image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(actual: Point, left: f64, top: f64) {
        assert!(
            (actual.left - left).abs() < 1e-9 && (actual.top - top).abs() < 1e-9,
            "expected ({}, {}), got ({}, {})",
            left,
            top,
            actual.left,
            actual.top
        );
    }

    #[test]
    fn test_rectangle_inside_needs_no_move() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let coords = Coordinates::new(100.0, 100.0, 200.0, 200.0);
        assert_point(fit_rectangle_to_image(&coords, &image), 0.0, 0.0);
    }

    #[test]
    fn test_rectangle_past_left_edge() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let coords = Coordinates::new(-50.0, 0.0, 200.0, 200.0);

        let offset = fit_rectangle_to_image(&coords, &image);
        assert_point(offset, 50.0, 0.0);

        let moved = coords.apply_move(offset);
        assert!(moved.left.abs() < 1e-9);
    }

    #[test]
    fn test_rectangle_past_bottom_right() {
        let image = ImageDescriptor::new(800.0, 600.0, 0.0);
        let coords = Coordinates::new(700.0, 550.0, 200.0, 100.0);
        assert_point(fit_rectangle_to_image(&coords, &image), -100.0, -50.0);
    }

    #[test]
    fn test_oversized_rectangle_prefers_near_edges() {
        let image = ImageDescriptor::new(100.0, 100.0, 0.0);
        let coords = Coordinates::new(-20.0, -10.0, 200.0, 150.0);

        // Both edges are crossed on each axis; left and top win
        assert_point(fit_rectangle_to_image(&coords, &image), 20.0, 10.0);
    }

    #[test]
    fn test_rectangle_in_rotated_image() {
        // 1000x1000 rotated 90° has the same footprint
        let image = ImageDescriptor::new(1000.0, 1000.0, 90.0);
        let coords = Coordinates::new(-50.0, 0.0, 200.0, 200.0);
        assert_point(fit_rectangle_to_image(&coords, &image), 50.0, 0.0);
    }

    #[test]
    fn test_rectangle_in_corner_of_rotated_image() {
        // At 45° the corners of the bounding box are outside the image
        let image = ImageDescriptor::new(1000.0, 1000.0, 45.0);
        let coords = Coordinates::new(0.0, 0.0, 100.0, 100.0);

        let moved = coords.apply_move(fit_rectangle_to_image(&coords, &image));
        let center = image.center();
        for corner in moved.corners() {
            let p = rotate_point(corner, -image.angle, center);
            let left = center.left - 500.0;
            let top = center.top - 500.0;
            assert!(p.left >= left - 1e-6 && p.left <= left + 1000.0 + 1e-6);
            assert!(p.top >= top - 1e-6 && p.top <= top + 1000.0 + 1e-6);
        }
    }

    #[test]
    fn test_ellipse_uses_its_bounding_box() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let coords = Coordinates::new(900.0, -30.0, 200.0, 100.0);
        assert_point(fit_ellipse_to_image(&coords, &image), -100.0, 30.0);
    }

    #[test]
    fn test_ellipse_centered_in_rotated_image() {
        let image = ImageDescriptor::new(1000.0, 600.0, 30.0);
        let center = image.center();
        let coords = Coordinates::new(center.left - 100.0, center.top - 100.0, 200.0, 200.0);
        assert_point(fit_ellipse_to_image(&coords, &image), 0.0, 0.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
