//! Fixed-threshold binarization.

use crate::error::{Result, RoiError};
use crate::raster::Raster;

/// Apply binary threshold to a grayscale raster.
///
/// # Arguments
/// * `raster` - Grayscale input
/// * `threshold` - Threshold value, must be in 0-255
///
/// # Returns
/// Binary raster where pixels >= threshold become 255, others become 0
pub fn binarize(raster: &Raster, threshold: i32) -> Result<Raster> {
    let threshold = checked_threshold(threshold)?;
    let output = raster
        .as_array()
        .mapv(|v| if v >= threshold { 255 } else { 0 });
    Ok(Raster::from_valid(output))
}

/// Validate a threshold coming from metadata.
pub fn checked_threshold(threshold: i32) -> Result<u8> {
    u8::try_from(threshold)
        .map_err(|_| RoiError::invalid("threshold", format!("{threshold} is outside 0..=255")))
}
