//! Error types for state construction and settings validation.
//!
//! The solvers themselves never fail: an unsatisfiable request is expressed
//! as `None` and the pipeline keeps the previous state. Errors only exist at
//! the edges, where a host hands in sizes or settings that cannot describe a
//! cropper at all.

use thiserror::Error;

/// Error types for building or replacing parts of a cropper state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// The loaded image has no usable area.
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },

    /// The viewport has no usable area.
    #[error("Invalid boundary size: {width}x{height}")]
    InvalidBoundary { width: f64, height: f64 },

    /// A visible area must have a positive, finite size.
    #[error("Invalid visible area size: {width}x{height}")]
    InvalidVisibleArea { width: f64, height: f64 },
}

/// Error types for cropper settings validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// A size bound is negative or `NaN`.
    #[error("Invalid {name}: {value}")]
    InvalidSizeBound { name: &'static str, value: f64 },

    /// A minimum size bound exceeds its maximum.
    #[error("{axis} minimum {minimum} exceeds maximum {maximum}")]
    InvertedSizeBounds {
        axis: &'static str,
        minimum: f64,
        maximum: f64,
    },

    /// Aspect ratios must be strictly positive.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    /// The aspect ratio range is empty.
    #[error("Aspect ratio minimum {minimum} exceeds maximum {maximum}")]
    InvertedAspectRatio { minimum: f64, maximum: f64 },
}
