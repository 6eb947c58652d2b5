//! Aspect ratio and size bounds for the stencil.
//!
//! Size restrictions come from several sources and are intersected with
//! [`SizeRestrictions::merge`]:
//! - caller-supplied bounds from [`CropperSettings`](crate::CropperSettings)
//! - the image itself, rotated by its current angle
//!   ([`image_to_size_restrictions`])
//!
//! Unbounded maxima are stored as `f64::INFINITY` and serialize as `null`.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::geometry::{is_greater, is_lower, rotate_size, ImageDescriptor, Size};

/// Serde adapter mapping `f64::INFINITY` to an absent value and back.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }

    pub fn infinity() -> f64 {
        f64::INFINITY
    }
}

/// Allowed range of `width / height` for the stencil.
///
/// `minimum == maximum` pins a fixed ratio. The default is unconstrained
/// (`0..=∞`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    #[serde(default)]
    pub minimum: f64,
    #[serde(with = "unbounded", default = "unbounded::infinity")]
    pub maximum: f64,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl AspectRatio {
    pub const UNCONSTRAINED: AspectRatio = AspectRatio {
        minimum: 0.0,
        maximum: f64::INFINITY,
    };

    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    /// A single allowed ratio.
    pub fn fixed(ratio: f64) -> Self {
        Self::new(ratio, ratio)
    }

    /// Combine a fixed ratio and individual bounds.
    ///
    /// A fixed `aspect` overrides both bounds; absent bounds fall back to
    /// `0` and `∞`.
    pub fn resolve(aspect: Option<f64>, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self::new(
            aspect.or(minimum).unwrap_or(0.0),
            aspect.or(maximum).unwrap_or(f64::INFINITY),
        )
    }

    /// Nearest ratio inside the range.
    pub fn clamp(&self, ratio: f64) -> f64 {
        ratio.max(self.minimum).min(self.maximum)
    }

    /// `ratio` lies in the range, within tolerance.
    pub fn contains(&self, ratio: f64) -> bool {
        !ratio.is_nan() && !is_lower(ratio, self.minimum) && !is_greater(ratio, self.maximum)
    }

    /// The bounds that actually constrain: finite and strictly positive.
    pub fn finite_bounds(&self) -> impl Iterator<Item = f64> {
        [self.minimum, self.maximum]
            .into_iter()
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.finite_bounds().next().is_none()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for value in [self.minimum, self.maximum] {
            if value.is_nan() || value < 0.0 {
                return Err(SettingsError::InvalidAspectRatio(value));
            }
        }
        if self.minimum > self.maximum {
            return Err(SettingsError::InvertedAspectRatio {
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        Ok(())
    }
}

/// Hard bounds on the stencil size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRestrictions {
    #[serde(default)]
    pub min_width: f64,
    #[serde(default)]
    pub min_height: f64,
    #[serde(with = "unbounded", default = "unbounded::infinity")]
    pub max_width: f64,
    #[serde(with = "unbounded", default = "unbounded::infinity")]
    pub max_height: f64,
}

impl Default for SizeRestrictions {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}

impl SizeRestrictions {
    pub const UNRESTRICTED: SizeRestrictions = SizeRestrictions {
        min_width: 0.0,
        min_height: 0.0,
        max_width: f64::INFINITY,
        max_height: f64::INFINITY,
    };

    pub fn new(min_width: f64, min_height: f64, max_width: f64, max_height: f64) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Only upper bounds.
    pub fn maximum(max_width: f64, max_height: f64) -> Self {
        Self::new(0.0, 0.0, max_width, max_height)
    }

    /// Intersection: the larger minima and the smaller maxima.
    pub fn merge(&self, other: &SizeRestrictions) -> Self {
        Self::new(
            self.min_width.max(other.min_width),
            self.min_height.max(other.min_height),
            self.max_width.min(other.max_width),
            self.max_height.min(other.max_height),
        )
    }

    /// Largest uniform scale in `(0, 1]` that keeps `size` within the maxima.
    ///
    /// Never grows a size. Degenerate sizes get `1.0` and are left for
    /// validation to reject.
    pub fn fit_coefficient(&self, size: Size) -> f64 {
        if !size.is_positive() {
            return 1.0;
        }
        let coefficient = (self.max_width / size.width)
            .min(self.max_height / size.height)
            .min(1.0);

        if coefficient.is_finite() && coefficient > 0.0 {
            coefficient
        } else {
            1.0
        }
    }
}

/// Largest size of the given `ratio` that fits inside the rotated image.
///
/// The candidate rectangle is axis-aligned on screen while the image is
/// rotated by `image.angle`, so in the image's own frame the rectangle is
/// rotated by the opposite angle. Its bounding box there (the "wrapper") has
/// to fit inside the natural image size; whichever image dimension is the
/// tighter one decides the scale.
///
/// Returns zero minima. Degenerate ratios (zero, infinite, `NaN`) yield
/// [`SizeRestrictions::UNRESTRICTED`].
pub fn image_to_size_restrictions(image: &ImageDescriptor, ratio: f64) -> SizeRestrictions {
    if !(ratio.is_finite() && ratio > 0.0) {
        return SizeRestrictions::UNRESTRICTED;
    }

    let wrapper = rotate_size(Size::new(ratio, 1.0), image.angle);

    let max_height = if image.width / image.height >= wrapper.ratio() {
        image.height / wrapper.height
    } else {
        image.width / wrapper.width
    };

    SizeRestrictions::maximum(max_height * ratio, max_height)
}
