//! Rotation dial arithmetic.
//!
//! The dial shows an absolute angle as a whole number of quarter turns plus
//! a small adjustment. The quarter-turn buttons snap to the next multiple of
//! 90 degrees, removing any adjustment first.

use serde::{Deserialize, Serialize};

/// An absolute angle split into quarter turns and a residual adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationSteps {
    /// Number of quarter turns in the angle's magnitude
    pub quarter: u32,
    /// Signed remainder in degrees, within `[-45, 45]`
    pub adjustment: f64,
}

impl RotationSteps {
    /// Decompose `angle` (degrees).
    ///
    /// # Arguments
    ///
    /// * `angle` - Absolute rotation in degrees
    /// * `previous_quarter` - Quarter count kept when the angle sits exactly
    ///   halfway between two quarter turns
    pub fn from_angle(angle: f64, previous_quarter: u32) -> Self {
        let magnitude = angle.abs();
        let remainder = magnitude % 90.0;
        let whole = (magnitude - remainder) / 90.0;

        let quarter = if remainder > 45.0 {
            (whole as u32).saturating_add(1)
        } else if remainder < 45.0 {
            whole as u32
        } else {
            previous_quarter
        };

        let adjustment = if angle == 0.0 {
            0.0
        } else {
            angle.signum() * (magnitude - f64::from(quarter) * 90.0)
        };

        Self {
            quarter,
            adjustment,
        }
    }

    /// Rotation delta for the rotate-left button.
    pub fn rotate_left_step(&self) -> f64 {
        if self.adjustment > 0.0 {
            -self.adjustment
        } else if self.adjustment < 0.0 {
            -90.0 - self.adjustment
        } else {
            -90.0
        }
    }

    /// Rotation delta for the rotate-right button.
    pub fn rotate_right_step(&self) -> f64 {
        if self.adjustment > 0.0 {
            90.0 - self.adjustment
        } else if self.adjustment < 0.0 {
            -self.adjustment
        } else {
            90.0
        }
    }
}

/// Most ticks [`bar_values`] returns.
pub const MAX_BAR_VALUES: usize = 10_000;

/// Tick values of the dial: `from`, `from + step`, ... up to but excluding `to`.
///
/// A zero step is treated as 1; a range that runs against the step is empty.
/// At most [`MAX_BAR_VALUES`] ticks are returned.
pub fn bar_values(from: f64, to: f64, step: f64) -> Vec<f64> {
    let step = if step == 0.0 { 1.0 } else { step };
    let count = ((to - from) / step).ceil();
    if !(count.is_finite() && count > 0.0) {
        return Vec::new();
    }

    let count = (count as usize).min(MAX_BAR_VALUES);
    (0..count).map(|i| from + i as f64 * step).collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
