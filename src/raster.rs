//! Owned 8-bit single-channel raster.
//!
//! Pixels are stored row-major in an `ndarray::Array2<u8>` of shape
//! `(height, width)`, the same `[[y, x]]` indexing the filters use.

use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

use crate::error::{Result, RoiError};
use crate::geometry::{Point, Rectangle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    data: Array2<u8>,
}

impl Raster {
    /// Create a raster filled with `value`.
    pub fn new(width: usize, height: usize, value: u8) -> Result<Self> {
        check_dims(width, height)?;
        Ok(Self {
            data: Array2::from_elem((height, width), value),
        })
    }

    /// Wrap row-major pixel data.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        check_dims(width, height)?;
        let len = data.len();
        let data = Array2::from_shape_vec((height, width), data).map_err(|_| {
            RoiError::invalid(
                "data",
                format!("expected {} pixels for {width}x{height}, got {len}", width * height),
            )
        })?;
        Ok(Self { data })
    }

    /// Wrap an array of any memory layout; the pixels are stored row-major.
    pub fn from_array(data: Array2<u8>) -> Result<Self> {
        let (height, width) = data.dim();
        check_dims(width, height)?;
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Wrap an array whose shape is already known to be non-empty, such as
    /// the output of a per-pixel map over another raster.
    pub(crate) fn from_valid(data: Array2<u8>) -> Self {
        debug_assert!(data.nrows() > 0 && data.ncols() > 0);
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width() && (p.y as usize) < self.height()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.data.get((y, x)).copied()
    }

    /// Write a pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if let Some(px) = self.data.get_mut((y, x)) {
            *px = value;
        }
    }

    pub fn as_array(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    pub fn as_array_mut(&mut self) -> ArrayViewMut2<'_, u8> {
        self.data.view_mut()
    }

    /// Copy out the region `rect`; fails unless it lies inside the raster.
    pub fn crop(&self, rect: &Rectangle) -> Result<Raster> {
        if !rect.fits_within(self.width(), self.height()) {
            return Err(RoiError::invalid(
                "crop",
                format!(
                    "rectangle x={} y={} width={} height={} does not fit in {}x{} raster",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    self.width(),
                    self.height()
                ),
            ));
        }
        let (x, y) = (rect.x as usize, rect.y as usize);
        let (w, h) = (rect.width as usize, rect.height as usize);
        Ok(Self {
            data: self.data.slice(s![y..y + h, x..x + w]).to_owned(),
        })
    }

    /// Row-major pixel data.
    pub fn into_raw(self) -> Vec<u8> {
        if !self.data.is_standard_layout() {
            return self.data.iter().copied().collect();
        }
        let (data, _) = self.data.into_raw_vec_and_offset();
        data
    }

    pub fn into_array(self) -> Array2<u8> {
        self.data
    }
}

fn check_dims(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RoiError::invalid(
            "dimensions",
            format!("raster must be non-empty, got {width}x{height}"),
        ));
    }
    Ok(())
}
