//! Error type shared by every pipeline stage.
//!
//! All errors are fatal to a single run: no stage recovers locally and no
//! partial output is produced.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Point;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoiError {
    /// A threshold, crop rectangle, raster shape or similar argument is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to load image {}: {reason}", path.display())]
    ImageLoadFailed { path: PathBuf, reason: String },

    #[error("failed to write image {}: {reason}", path.display())]
    ImageWriteFailed { path: PathBuf, reason: String },

    /// Not enough contours to pick a region from.
    #[error("no contour found (tracer produced {found} contour(s))")]
    NoContourFound { found: usize },

    #[error("seed ({}, {}) lies outside the {width}x{height} raster", seed.x, seed.y)]
    SeedOutOfBounds {
        seed: Point,
        width: usize,
        height: usize,
    },

    #[error("no metadata entry for image `{id}`")]
    MetadataMissing { id: String },

    #[error("malformed metadata: {reason}")]
    MetadataInvalid { reason: String },
}

impl RoiError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "python")]
impl From<RoiError> for pyo3::PyErr {
    fn from(err: RoiError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = RoiError::SeedOutOfBounds {
            seed: Point::new(12, -1),
            width: 10,
            height: 10,
        };
        assert_eq!(err.to_string(), "seed (12, -1) lies outside the 10x10 raster");

        let err = RoiError::invalid("threshold", "300 is outside 0..=255");
        assert_eq!(
            err.to_string(),
            "invalid parameter `threshold`: 300 is outside 0..=255"
        );
    }
}
