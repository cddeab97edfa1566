//! Morphology filters: Dilate, Erode and background suppression.
//!
//! All operations work on single-channel u8 rasters with a binary
//! structuring element. Neighbors falling outside the raster are ignored,
//! so the border never darkens a dilation or brightens an erosion.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::raster::Raster;

/// Largest accepted kernel radius (a 2049x2049 element).
pub const MAX_KERNEL_RADIUS: usize = 1024;

/// Neighborhood shape of a structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelShape {
    /// Full `(2r+1) x (2r+1)` square.
    #[default]
    Rect,
    /// Disk of radius `r` (offsets with `dx² + dy² <= r²`).
    Ellipse,
}

/// Binary kernel of odd side `2r+1`, anchored at its center `(r, r)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: usize,
    mask: Array2<bool>,
}

impl StructuringElement {
    /// # Errors
    /// `InvalidParameter` when `radius` exceeds [`MAX_KERNEL_RADIUS`].
    pub fn new(shape: KernelShape, radius: usize) -> Result<Self> {
        check_radius(radius)?;
        Ok(Self::build(shape, radius))
    }

    pub fn rect(radius: usize) -> Result<Self> {
        Self::new(KernelShape::Rect, radius)
    }

    pub fn ellipse(radius: usize) -> Result<Self> {
        Self::new(KernelShape::Ellipse, radius)
    }

    /// Build an element whose radius has already been checked.
    pub(crate) fn build(shape: KernelShape, radius: usize) -> Self {
        let side = 2 * radius + 1;
        let mask = match shape {
            KernelShape::Rect => Array2::from_elem((side, side), true),
            KernelShape::Ellipse => {
                let r = radius as isize;
                Array2::from_shape_fn((side, side), |(j, i)| {
                    let dy = j as isize - r;
                    let dx = i as isize - r;
                    dx * dx + dy * dy <= r * r
                })
            }
        };
        Self { radius, mask }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Anchor position inside the kernel, as `(x, y)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.radius, self.radius)
    }

    /// Offsets `(dx, dy)` of the active kernel cells relative to the anchor.
    fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius as isize;
        self.mask
            .indexed_iter()
            .filter(|(_, &on)| on)
            .map(|((j, i), _)| (i as isize - r, j as isize - r))
            .collect()
    }
}

/// Validate a kernel radius and return the element side `2r+1`.
pub fn check_radius(radius: usize) -> Result<usize> {
    let side = radius
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .filter(|_| radius <= MAX_KERNEL_RADIUS);
    side.ok_or_else(|| {
        RoiError::invalid(
            "kernel_radius",
            format!("{radius} exceeds the maximum of {MAX_KERNEL_RADIUS}"),
        )
    })
}

/// Fold every pixel's in-bounds neighborhood with `pick`, starting at `init`.
fn morph(input: &Raster, element: &StructuringElement, init: u8, pick: fn(u8, u8) -> u8) -> Raster {
    let src = input.as_array();
    let (height, width) = src.dim();
    let offsets = element.offsets();

    let output = Array2::from_shape_fn((height, width), |(y, x)| {
        let mut acc = init;
        for &(dx, dy) in &offsets {
            let sx = x as isize + dx;
            let sy = y as isize + dy;
            if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
                continue;
            }
            acc = pick(acc, src[[sy as usize, sx as usize]]);
        }
        acc
    });

    Raster::from_valid(output)
}

/// Apply dilation to a raster.
///
/// Dilate takes the maximum value in the neighborhood,
/// making bright regions grow and dark regions shrink.
pub fn dilate(input: &Raster, element: &StructuringElement) -> Raster {
    morph(input, element, u8::MIN, std::cmp::max)
}

/// Apply erosion to a raster.
///
/// Erode takes the minimum value in the neighborhood,
/// making dark regions grow and bright regions shrink.
pub fn erode(input: &Raster, element: &StructuringElement) -> Raster {
    morph(input, element, u8::MAX, std::cmp::min)
}

/// Estimate the local background with one dilation pass and subtract the
/// input from it, saturating at zero.
///
/// Dark detail narrower than the kernel stands out against its bright
/// surroundings; flat regions go to zero.
///
/// # Errors
/// `InvalidParameter` when `kernel_radius` exceeds [`MAX_KERNEL_RADIUS`].
pub fn suppress_background(composite: Raster, kernel_radius: usize) -> Result<Raster> {
    let element = StructuringElement::rect(kernel_radius)?;
    Ok(suppress_background_with(composite, &element))
}

pub fn suppress_background_with(composite: Raster, element: &StructuringElement) -> Raster {
    let background = dilate(&composite, element);
    let mut output = background.into_array();
    output.zip_mut_with(&composite.as_array(), |bg, &px| *bg = bg.saturating_sub(px));
    Raster::from_valid(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(size: usize, value: u8) -> Raster {
        let mut raster = Raster::new(size, size, 0).unwrap();
        raster.set(size / 2, size / 2, value);
        raster
    }

    #[test]
    fn test_structuring_element_shapes() {
        let rect = StructuringElement::rect(2).unwrap();
        assert_eq!(rect.side(), 5);
        assert_eq!(rect.anchor(), (2, 2));
        assert_eq!(rect.offsets().len(), 25);

        let disk = StructuringElement::ellipse(2).unwrap();
        // corners of the 5x5 square are outside the disk
        assert_eq!(disk.offsets().len(), 13);
        assert!(!disk.offsets().contains(&(2, 2)));
    }

    #[test]
    fn test_dilate_grows_bright_square() {
        let out = dilate(&single_pixel(7, 200), &StructuringElement::rect(1).unwrap());
        for y in 0..7 {
            for x in 0..7 {
                let inside = (2..=4).contains(&x) && (2..=4).contains(&y);
                assert_eq!(out.get(x, y), Some(if inside { 200 } else { 0 }));
            }
        }
    }

    #[test]
    fn test_erode_ignores_border() {
        let raster = Raster::new(4, 4, 90).unwrap();
        let out = erode(&raster, &StructuringElement::rect(1).unwrap());
        assert_eq!(out, raster);
    }

    #[test]
    fn test_erode_shrinks_bright() {
        let mut raster = Raster::new(5, 5, 255).unwrap();
        raster.set(2, 2, 10);
        let out = erode(&raster, &StructuringElement::rect(1).unwrap());
        assert_eq!(out.get(1, 1), Some(10));
        assert_eq!(out.get(0, 0), Some(255));
    }

    #[test]
    fn test_dilation_monotone() {
        let data = (0..121u32).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let raster = Raster::from_vec(11, 11, data).unwrap();
        for element in [StructuringElement::rect(2).unwrap(), StructuringElement::ellipse(3).unwrap()] {
            let dilated = dilate(&raster, &element);
            for y in 0..11 {
                for x in 0..11 {
                    assert!(dilated.get(x, y) >= raster.get(x, y));
                }
            }
        }
    }

    #[test]
    fn test_suppress_background_highlights_dark_spot() {
        let mut raster = Raster::new(9, 9, 180).unwrap();
        raster.set(4, 4, 30);
        let out = suppress_background(raster, 2).unwrap();
        assert_eq!(out.get(4, 4), Some(150));
        assert_eq!(out.get(0, 0), Some(0));
        assert_eq!(out.get(3, 4), Some(0));
    }

    #[test]
    fn test_zero_radius_is_identity_dilation() {
        let raster = single_pixel(5, 77);
        assert_eq!(dilate(&raster, &StructuringElement::rect(0).unwrap()), raster);
        let out = suppress_background(raster, 0).unwrap();
        assert!(out.as_array().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_oversized_radius_rejected() {
        for radius in [MAX_KERNEL_RADIUS + 1, 50_000, usize::MAX / 2 + 1, usize::MAX] {
            assert!(matches!(
                StructuringElement::rect(radius),
                Err(RoiError::InvalidParameter { name: "kernel_radius", .. })
            ));
            assert!(StructuringElement::ellipse(radius).is_err());
        }
        assert_eq!(check_radius(MAX_KERNEL_RADIUS).unwrap(), 2 * MAX_KERNEL_RADIUS + 1);
        assert!(suppress_background(Raster::new(3, 3, 0).unwrap(), usize::MAX).is_err());
    }
}
