//! Image I/O.
//!
//! - `FileImageSource`: decode PNG/JPEG/BMP/TIFF from disk into an 8-bit gray raster.
//! - `save_png`: write a raster to a grayscale PNG, creating parent directories.

use std::fs;
use std::path::Path;

use image::{GrayImage, ImageFormat};

use crate::error::{Result, RoiError};
use crate::raster::Raster;

/// Source of decoded single-channel rasters.
pub trait ImageSource: Send + Sync {
    /// # Errors
    /// `ImageLoadFailed` when the file is unreadable, undecodable or empty.
    fn load(&self, path: &Path) -> Result<Raster>;
}

/// Reads images from the filesystem, converting color input to luma.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn load(&self, path: &Path) -> Result<Raster> {
        load_grayscale(path)
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale(path: &Path) -> Result<Raster> {
    let failed = |reason: String| RoiError::ImageLoadFailed {
        path: path.to_path_buf(),
        reason,
    };
    let img = image::open(path).map_err(|e| failed(e.to_string()))?.into_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    if width == 0 || height == 0 {
        return Err(failed("image is empty".into()));
    }
    Raster::from_vec(width, height, img.into_raw()).map_err(|e| failed(e.to_string()))
}

/// Save a raster as a grayscale PNG.
pub fn save_png(raster: &Raster, path: &Path) -> Result<()> {
    let failed = |reason: String| RoiError::ImageWriteFailed {
        path: path.to_path_buf(),
        reason,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
    }
    let (width, height) = (raster.width() as u32, raster.height() as u32);
    let image = GrayImage::from_raw(width, height, raster.clone().into_raw())
        .ok_or_else(|| failed("buffer does not match dimensions".into()))?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| failed(e.to_string()))
}
