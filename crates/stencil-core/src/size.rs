//! Size solver: the closest valid stencil size for a requested one.
//!
//! # Algorithm
//!
//! Both variants work the same way:
//!
//! 1. Build a small candidate set from the request, its clamped forms and
//!    one width-driven plus one height-driven size per finite ratio bound
//! 2. Shrink every candidate by the largest uniform factor that keeps it
//!    within its restrictions (candidates are never grown)
//! 3. Drop candidates that break the aspect ratio, the maxima, the minima
//!    or have no area
//! 4. Pick the candidate nearest to the request in (width, height) space
//!
//! Step 1 runs twice, around the request raised to the minimum size and
//! around the raw request. If nothing survives step 3, the search is
//! repeated around the raw request without the minimum size floor: the
//! minimum is a preference, not a guarantee. If that also fails the solver
//! returns `None`. Feeding a result back in as the request returns it
//! unchanged.
//!
//! The rectangle variant additionally limits every candidate to the largest
//! rectangle of its own ratio that fits inside the rotated image
//! ([`image_to_size_restrictions`]). The ellipse variant only uses the
//! natural image size; keeping it inside the rotated image is left to the
//! fit solver.

use tracing::debug;

use crate::constraints::{image_to_size_restrictions, AspectRatio, SizeRestrictions};
use crate::geometry::{is_greater, is_lower, size_distance, ImageDescriptor, Size};

/// Whether the minimum size floor takes part in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinimumPolicy {
    Enforce,
    Ignore,
}

/// Check a shrunk candidate against its restrictions.
fn is_valid(
    size: Size,
    aspect_ratio: &AspectRatio,
    restrictions: &SizeRestrictions,
    minimum: MinimumPolicy,
    round_maxima: bool,
) -> bool {
    if !size.is_positive() || !aspect_ratio.contains(size.ratio()) {
        return false;
    }

    // Rotation-derived maxima are rarely integral; a pixel of slack keeps
    // whole-pixel sizes at the limit valid
    let (max_width, max_height) = if round_maxima {
        (restrictions.max_width.ceil(), restrictions.max_height.ceil())
    } else {
        (restrictions.max_width, restrictions.max_height)
    };
    if is_greater(size.width, max_width) || is_greater(size.height, max_height) {
        return false;
    }

    minimum == MinimumPolicy::Ignore
        || (!is_lower(size.width, restrictions.min_width)
            && !is_lower(size.height, restrictions.min_height))
}

/// Nearest valid candidate to `request`, first one wins on ties.
fn best_candidate<F>(candidates: &[Size], request: Size, mut valid: F) -> Option<Size>
where
    F: FnMut(Size) -> bool,
{
    let mut best: Option<(Size, f64)> = None;
    for &candidate in candidates {
        if !valid(candidate) {
            continue;
        }
        let distance = size_distance(candidate, request);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(size, _)| size)
}

/// Search with the minimum floor, then without it.
///
/// `build` turns a base size into shrunk candidates. The strict search
/// builds around both the floor-clamped and the raw base, so a base that
/// already meets every bound is its own nearest candidate. The relaxed
/// search builds around the raw request only, so a request that is valid
/// once the floor is dropped comes back unchanged. Sizes built around the
/// relaxed result get one more strict search, so a result fed back in as
/// the request comes back unchanged.
fn solve_with_fallback<B, C, V>(request: Size, build: B, clamp: C, valid: V) -> Option<Size>
where
    B: Fn(Size) -> Vec<Size>,
    C: Fn(Size) -> Size,
    V: Fn(Size, MinimumPolicy) -> bool,
{
    let strict = |base: Size| {
        let mut candidates = build(clamp(base));
        candidates.extend(build(base));
        best_candidate(&candidates, request, |c| valid(c, MinimumPolicy::Enforce))
    };

    if let Some(size) = strict(request) {
        return Some(size);
    }

    debug!(
        width = request.width,
        height = request.height,
        "no stencil size satisfies the minimum, relaxing it"
    );
    let Some(relaxed) = best_candidate(&build(request), request, |c| {
        valid(c, MinimumPolicy::Ignore)
    }) else {
        debug!(
            width = request.width,
            height = request.height,
            "no valid stencil size"
        );
        return None;
    };

    Some(strict(relaxed).unwrap_or(relaxed))
}

/// The request raised to the minimum size.
fn clamp_to_minimum(request: Size, restrictions: &SizeRestrictions) -> Size {
    Size::new(
        request.width.max(restrictions.min_width),
        request.height.max(restrictions.min_height),
    )
}

/// General size approximation under plain size restrictions.
///
/// # Arguments
///
/// * `request` - Desired size
/// * `restrictions` - Hard bounds; the maxima are respected exactly
/// * `aspect_ratio` - Allowed ratio range
///
/// # Returns
///
/// The nearest valid size, or `None` when no size with positive area fits.
pub fn approximate_size(
    request: Size,
    restrictions: &SizeRestrictions,
    aspect_ratio: &AspectRatio,
) -> Option<Size> {
    let build = |base: Size| -> Vec<Size> {
        let mut candidates = vec![base];
        for ratio in aspect_ratio.finite_bounds() {
            candidates.push(Size::new(base.width, base.width / ratio));
            candidates.push(Size::new(base.height * ratio, base.height));
        }
        candidates
            .into_iter()
            .map(|candidate| candidate.scale(restrictions.fit_coefficient(candidate)))
            .collect()
    };

    solve_with_fallback(
        request,
        build,
        |base| clamp_to_minimum(base, restrictions),
        |size, minimum| is_valid(size, aspect_ratio, restrictions, minimum, false),
    )
}

/// Closest valid size for a rectangular stencil inside a rotated image.
///
/// # Arguments
///
/// * `request` - Desired size, usually the current stencil size
/// * `image` - Image size and rotation
/// * `aspect_ratio` - Allowed ratio range
/// * `restrictions` - Caller-supplied bounds
///
/// # Returns
///
/// The nearest valid size, or `None` when even the relaxed search fails.
pub fn fitted_rectangle_size(
    request: Size,
    image: &ImageDescriptor,
    aspect_ratio: &AspectRatio,
    restrictions: &SizeRestrictions,
) -> Option<Size> {
    let rotated = image.rotated_size();
    let bounded = restrictions.merge(&SizeRestrictions::maximum(rotated.width, rotated.height));

    let build = |base: Size| -> Vec<Size> {
        // Largest rectangle of the nearest allowed ratio
        let angle_restrictions = image_to_size_restrictions(image, aspect_ratio.clamp(base.ratio()));

        let mut candidates = vec![
            base,
            Size::new(
                bounded.max_width.min(angle_restrictions.max_width),
                bounded.max_height.min(angle_restrictions.max_height),
            ),
        ];

        for ratio in aspect_ratio.finite_bounds() {
            let fitted = bounded.merge(&image_to_size_restrictions(image, ratio));
            let width = base.width.min(fitted.max_width);
            let height = base.height.min(fitted.max_height);

            candidates.push(Size::new(width, width / ratio));
            candidates.push(Size::new(height * ratio, height));
        }

        candidates
            .into_iter()
            .map(|candidate| {
                let limits = image_to_size_restrictions(image, candidate.ratio()).merge(&bounded);
                candidate.scale(limits.fit_coefficient(candidate))
            })
            .collect()
    };

    solve_with_fallback(
        request,
        build,
        |base| clamp_to_minimum(base, &bounded),
        |size, minimum| {
            let limits = restrictions.merge(&image_to_size_restrictions(image, size.ratio()));
            is_valid(size, aspect_ratio, &limits, minimum, true)
        },
    )
}

/// Closest valid size for an elliptical stencil.
///
/// Bounded by the natural image size intersected with `restrictions`; the
/// rotation is not taken into account here.
pub fn fitted_ellipse_size(
    request: Size,
    image: &ImageDescriptor,
    aspect_ratio: &AspectRatio,
    restrictions: &SizeRestrictions,
) -> Option<Size> {
    approximate_size(
        request,
        &restrictions.merge(&SizeRestrictions::maximum(image.width, image.height)),
        aspect_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_size(actual: Option<Size>, width: f64, height: f64) {
        let actual = actual.expect("expected a size");
        assert!(
            (actual.width - width).abs() < 1e-6 && (actual.height - height).abs() < 1e-6,
            "expected {}x{}, got {}x{}",
            width,
            height,
            actual.width,
            actual.height
        );
    }

    #[test]
    fn test_oversized_request_clamped_to_image() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(1200.0, 1200.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::UNRESTRICTED,
        );
        assert_size(size, 1000.0, 1000.0);
    }

    #[test]
    fn test_fixed_square_in_wide_image() {
        let image = ImageDescriptor::new(1000.0, 500.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(1000.0, 500.0),
            &image,
            &AspectRatio::fixed(1.0),
            &SizeRestrictions::UNRESTRICTED,
        )
        .unwrap();

        assert!((size.width - size.height).abs() < 1e-6);
        assert!(size.width <= 500.0 + 1e-6);
        assert_size(Some(size), 500.0, 500.0);
    }

    #[test]
    fn test_valid_request_is_kept() {
        let image = ImageDescriptor::new(1000.0, 800.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(300.0, 200.0),
            &image,
            &AspectRatio::new(1.0, 2.0),
            &SizeRestrictions::UNRESTRICTED,
        );
        assert_size(size, 300.0, 200.0);
    }

    #[test]
    fn test_ratio_range_pulls_to_nearest_bound() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(400.0, 100.0),
            &image,
            &AspectRatio::new(0.5, 2.0),
            &SizeRestrictions::UNRESTRICTED,
        )
        .unwrap();

        assert!((size.ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_image_shrinks_square() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 45.0);
        let size = fitted_rectangle_size(
            Size::new(1000.0, 1000.0),
            &image,
            &AspectRatio::fixed(1.0),
            &SizeRestrictions::UNRESTRICTED,
        );
        let side = 1000.0 / std::f64::consts::SQRT_2;
        assert_size(size, side, side);
    }

    #[test]
    fn test_minimum_size_is_honoured() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(10.0, 10.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::new(100.0, 50.0, f64::INFINITY, f64::INFINITY),
        );
        assert_size(size, 100.0, 50.0);
    }

    #[test]
    fn test_infeasible_minimum_is_relaxed() {
        // Minimum larger than the image: the floor is dropped
        let image = ImageDescriptor::new(400.0, 300.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(200.0, 200.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::new(500.0, 500.0, f64::INFINITY, f64::INFINITY),
        )
        .unwrap();

        assert!(size.is_positive());
        assert!(size.width <= 400.0 + 1e-6);
        assert!(size.height <= 300.0 + 1e-6);
    }

    #[test]
    fn test_unreachable_minimum_keeps_valid_request() {
        // A 232px floor cannot fit in a 100px tall image
        let image = ImageDescriptor::new(2700.0, 100.0, 0.0);
        let restrictions = SizeRestrictions::new(0.0, 232.0, f64::INFINITY, f64::INFINITY);
        let request = Size::new(2700.0, 100.0);

        let rectangle =
            fitted_rectangle_size(request, &image, &AspectRatio::UNCONSTRAINED, &restrictions);
        assert_size(rectangle, 2700.0, 100.0);

        let ellipse =
            fitted_ellipse_size(request, &image, &AspectRatio::UNCONSTRAINED, &restrictions);
        assert_size(ellipse, 2700.0, 100.0);
    }

    #[test]
    fn test_partially_reachable_minimum_is_stable() {
        // Only narrow stencils reach the floor inside the rotated strip
        let image = ImageDescriptor::new(2017.0, 100.0, 13.3);
        let restrictions = SizeRestrictions::new(0.0, 57.6, f64::INFINITY, f64::INFINITY);

        let first = fitted_rectangle_size(
            Size::new(2017.0, 100.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &restrictions,
        )
        .unwrap();
        let second =
            fitted_rectangle_size(first, &image, &AspectRatio::UNCONSTRAINED, &restrictions);

        assert_size(second, first.width, first.height);
    }

    #[test]
    fn test_caller_maximum_respected() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(800.0, 400.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::maximum(400.0, f64::INFINITY),
        );
        // The uniformly shrunk 400x200 is valid too, but 400x500 is
        // nearer to the request
        assert_size(size, 400.0, 500.0);
    }

    #[test]
    fn test_degenerate_request_has_no_size() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 0.0);
        let size = fitted_rectangle_size(
            Size::new(0.0, 0.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::UNRESTRICTED,
        );
        // The image-sized candidate is still available
        assert_size(size, 1000.0, 1000.0);

        let size = approximate_size(
            Size::new(0.0, 0.0),
            &SizeRestrictions::maximum(100.0, 100.0),
            &AspectRatio::UNCONSTRAINED,
        );
        assert!(size.is_none());
    }

    #[test]
    fn test_never_returns_nan() {
        let image = ImageDescriptor::new(1000.0, 1000.0, 30.0);
        let size = fitted_rectangle_size(
            Size::new(500.0, 0.0),
            &image,
            &AspectRatio::fixed(1.5),
            &SizeRestrictions::UNRESTRICTED,
        );
        if let Some(size) = size {
            assert!(size.is_positive());
        }
    }

    #[test]
    fn test_approximate_size_fixed_ratio() {
        let size = approximate_size(
            Size::new(300.0, 100.0),
            &SizeRestrictions::maximum(1000.0, 1000.0),
            &AspectRatio::fixed(1.0),
        );
        // 300x300 and 100x100 are equally far; the width-driven one comes first
        assert_size(size, 300.0, 300.0);
    }

    #[test]
    fn test_ellipse_ignores_rotation() {
        let image = ImageDescriptor::new(1000.0, 500.0, 45.0);
        let size = fitted_ellipse_size(
            Size::new(1000.0, 500.0),
            &image,
            &AspectRatio::UNCONSTRAINED,
            &SizeRestrictions::UNRESTRICTED,
        );
        assert_size(size, 1000.0, 500.0);
    }

    #[test]
    fn test_ellipse_bounded_by_natural_size() {
        let image = ImageDescriptor::new(600.0, 400.0, 0.0);
        let size = fitted_ellipse_size(
            Size::new(900.0, 900.0),
            &image,
            &AspectRatio::fixed(1.0),
            &SizeRestrictions::UNRESTRICTED,
        );
        assert_size(size, 400.0, 400.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
