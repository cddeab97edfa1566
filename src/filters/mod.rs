//! Raster filters used by the ROI pipeline.
//!
//! All filters work on single-channel u8 [`Raster`](crate::raster::Raster)s:
//!
//! - **Threshold**: fixed-level binarization to 0/255
//! - **Morphology**: dilate, erode and dilation-based background suppression

pub mod morphology;
pub mod threshold;

pub use morphology::{
    check_radius, dilate, erode, suppress_background, suppress_background_with, KernelShape,
    StructuringElement, MAX_KERNEL_RADIUS,
};
pub use threshold::binarize;
