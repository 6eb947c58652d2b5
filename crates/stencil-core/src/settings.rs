//! Cropper settings: stencil shape, aspect ratio and size bounds.
//!
//! Settings arrive from the host as a plain object. Every field is optional;
//! missing fields fall back to a rectangle stencil with no ratio or size
//! constraints.
//!
//! ```text
//! { "stencilType": "circle", "aspectRatio": 1, "minWidth": 64 }
//! ```

use serde::{Deserialize, Serialize};

use crate::constraints::{AspectRatio, SizeRestrictions};
use crate::error::SettingsError;
use crate::stencil::StencilType;

/// Host-supplied configuration for the reconciliation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropperSettings {
    /// Stencil shape
    pub stencil_type: StencilType,
    /// Fixed ratio; overrides the minimum and maximum when set
    pub aspect_ratio: Option<f64>,
    pub min_aspect_ratio: Option<f64>,
    pub max_aspect_ratio: Option<f64>,
    /// Minimum stencil width in image pixels
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    /// Maximum stencil width in image pixels
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl CropperSettings {
    /// Create settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stencil_type(mut self, stencil_type: StencilType) -> Self {
        self.stencil_type = stencil_type;
        self
    }

    /// Pin a single aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Allow a range of aspect ratios.
    pub fn with_aspect_ratio_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.aspect_ratio = None;
        self.min_aspect_ratio = Some(minimum);
        self.max_aspect_ratio = Some(maximum);
        self
    }

    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    pub fn with_max_size(mut self, width: f64, height: f64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Resolved aspect ratio range.
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::resolve(
            self.aspect_ratio,
            self.min_aspect_ratio,
            self.max_aspect_ratio,
        )
    }

    /// Caller-supplied size bounds.
    pub fn size_restrictions(&self) -> SizeRestrictions {
        SizeRestrictions::new(
            self.min_width.unwrap_or(0.0),
            self.min_height.unwrap_or(0.0),
            self.max_width.unwrap_or(f64::INFINITY),
            self.max_height.unwrap_or(f64::INFINITY),
        )
    }

    /// Check that the settings describe a satisfiable configuration.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::InvalidSizeBound`] for negative or `NaN` bounds
    /// - [`SettingsError::InvertedSizeBounds`] when a minimum exceeds its maximum
    /// - [`SettingsError::InvalidAspectRatio`] for non-positive ratios
    /// - [`SettingsError::InvertedAspectRatio`] for an empty ratio range
    pub fn validate(&self) -> Result<(), SettingsError> {
        let bounds = [
            ("minWidth", self.min_width),
            ("minHeight", self.min_height),
            ("maxWidth", self.max_width),
            ("maxHeight", self.max_height),
        ];
        for (name, value) in bounds {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(SettingsError::InvalidSizeBound { name, value });
                }
            }
        }

        let restrictions = self.size_restrictions();
        if restrictions.min_width > restrictions.max_width {
            return Err(SettingsError::InvertedSizeBounds {
                axis: "Width",
                minimum: restrictions.min_width,
                maximum: restrictions.max_width,
            });
        }
        if restrictions.min_height > restrictions.max_height {
            return Err(SettingsError::InvertedSizeBounds {
                axis: "Height",
                minimum: restrictions.min_height,
                maximum: restrictions.max_height,
            });
        }

        for ratio in [self.aspect_ratio, self.min_aspect_ratio, self.max_aspect_ratio]
            .into_iter()
            .flatten()
        {
            if ratio.is_nan() || ratio <= 0.0 {
                return Err(SettingsError::InvalidAspectRatio(ratio));
            }
        }

        self.aspect_ratio().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconstrained() {
        let settings = CropperSettings::new();
        assert_eq!(settings.stencil_type, StencilType::Rectangle);
        assert!(settings.aspect_ratio().is_unconstrained());
        assert_eq!(settings.size_restrictions(), SizeRestrictions::UNRESTRICTED);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_fixed_ratio_wins_over_range() {
        let settings = CropperSettings {
            aspect_ratio: Some(1.0),
            min_aspect_ratio: Some(0.5),
            max_aspect_ratio: Some(2.0),
            ..Default::default()
        };
        assert_eq!(settings.aspect_ratio(), AspectRatio::fixed(1.0));
    }

    #[test]
    fn test_builder() {
        let settings = CropperSettings::new()
            .with_stencil_type(StencilType::Circle)
            .with_aspect_ratio_range(0.75, 1.5)
            .with_min_size(50.0, 40.0)
            .with_max_size(800.0, 600.0);

        assert_eq!(settings.aspect_ratio(), AspectRatio::new(0.75, 1.5));
        assert_eq!(
            settings.size_restrictions(),
            SizeRestrictions::new(50.0, 40.0, 800.0, 600.0)
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let settings = CropperSettings::new().with_min_size(-1.0, 0.0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidSizeBound { name: "minWidth", .. })
        ));

        let settings = CropperSettings::new()
            .with_min_size(0.0, 500.0)
            .with_max_size(1000.0, 400.0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvertedSizeBounds { axis: "Height", .. })
        ));

        let settings = CropperSettings::new().with_aspect_ratio(0.0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidAspectRatio(_))
        ));

        let settings = CropperSettings::new().with_aspect_ratio_range(2.0, 1.0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvertedAspectRatio { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial_object() {
        let settings: CropperSettings =
            serde_json::from_str(r#"{"stencilType":"circle","aspectRatio":1.5,"minWidth":64}"#)
                .unwrap();

        assert_eq!(settings.stencil_type, StencilType::Circle);
        assert_eq!(settings.aspect_ratio(), AspectRatio::fixed(1.5));
        assert_eq!(settings.size_restrictions().min_width, 64.0);
        assert!(settings.size_restrictions().max_height.is_infinite());
    }
}
