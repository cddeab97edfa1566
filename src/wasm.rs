//! WebAssembly exports for ROI extraction.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat row-major grayscale bytes
//! (length = width * height). Errors surface as JS exceptions carrying the
//! error message.

use wasm_bindgen::prelude::*;

use crate::error::RoiError;
use crate::filters::morphology::{self, StructuringElement};
use crate::filters::threshold::binarize;
use crate::geometry::{Point, Rectangle};
use crate::metadata::ImageMetadata;
use crate::pipeline::{PipelineConfig, RoiPipeline};
use crate::raster::Raster;

fn js_error(err: RoiError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_raster(data: &[u8], width: usize, height: usize) -> Result<Raster, JsValue> {
    Raster::from_vec(width, height, data.to_vec()).map_err(js_error)
}

// ============================================================================
// Filters
// ============================================================================

/// Binarize grayscale bytes: pixels >= threshold become 255, others 0.
#[wasm_bindgen]
pub fn binarize_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    threshold: i32,
) -> Result<Vec<u8>, JsValue> {
    let input = to_raster(data, width, height)?;
    let result = binarize(&input, threshold).map_err(js_error)?;
    Ok(result.into_raw())
}

/// Grayscale dilation with a square (2r+1) element.
#[wasm_bindgen]
pub fn dilate_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = to_raster(data, width, height)?;
    let element = StructuringElement::rect(radius).map_err(js_error)?;
    Ok(morphology::dilate(&input, &element).into_raw())
}

/// dilate(image) - image, saturating at 0.
#[wasm_bindgen]
pub fn suppress_background_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = to_raster(data, width, height)?;
    let result = morphology::suppress_background(input, radius).map_err(js_error)?;
    Ok(result.into_raw())
}

// ============================================================================
// Full pipeline
// ============================================================================

/// Run ROI extraction on grayscale bytes.
///
/// # Arguments
/// * `crop_*` - Crop rectangle in image coordinates
/// * `seeds` - Flat `[x0, y0, x1, y1, ...]` flood-fill seeds in crop coordinates
///
/// # Returns
/// Flat bytes of the `crop_width * crop_height` result
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn extract_roi_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    crop_x: i32,
    crop_y: i32,
    crop_width: i32,
    crop_height: i32,
    threshold: i32,
    seeds: &[i32],
    kernel_radius: usize,
) -> Result<Vec<u8>, JsValue> {
    if seeds.len() % 2 != 0 {
        return Err(JsValue::from_str("seeds must hold (x, y) pairs"));
    }
    let input = to_raster(data, width, height)?;
    let metadata = ImageMetadata {
        crop: Rectangle::new(crop_x, crop_y, crop_width, crop_height),
        threshold,
        seeds: seeds.chunks_exact(2).map(|p| Point::new(p[0], p[1])).collect(),
    };
    let pipeline = RoiPipeline::new(PipelineConfig {
        kernel_radius,
        ..PipelineConfig::default()
    })
    .map_err(js_error)?;
    let output = pipeline.run(&input, &metadata).map_err(js_error)?;
    Ok(output.into_raw())
}
