//! Specimen ROI extraction
//!
//! Isolates the region of interest of a grayscale photograph (a specimen
//! on a plain background) and suppresses the background around it, with
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Everything works on single-channel 8-bit rasters, shape `(height, width)`.
//! Color input is converted to luma when loaded from disk.
//!
//! ## Pipeline
//! crop → binarize → contour trace → largest region → convex hull →
//! flood fill → mask compose → dilation-based background suppression.
//! See [`pipeline`] for the stage contract and [`RoiPipeline`] for the entry
//! points.

pub mod error;
pub mod filters;
pub mod geometry;
pub mod io;
pub mod metadata;
pub mod pipeline;
pub mod raster;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, RoiError};
pub use geometry::{Contour, Point, Polygon, Rectangle};
pub use io::{load_grayscale, save_png, FileImageSource, ImageSource};
pub use metadata::{ImageMetadata, InMemoryMetadata, MetadataSource, YamlMetadataStore};
pub use pipeline::{BatchJob, PipelineConfig, RoiPipeline, RoiResult};
pub use raster::Raster;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::prelude::*;

    use crate::filters::morphology::{self, KernelShape, StructuringElement};
    use crate::filters::threshold::binarize as binarize_raster;
    use crate::geometry::{Point, Rectangle};
    use crate::metadata::ImageMetadata;
    use crate::pipeline::{PipelineConfig, RoiPipeline};
    use crate::raster::Raster;

    fn to_raster(image: &PyReadonlyArray2<'_, u8>) -> PyResult<Raster> {
        Ok(Raster::from_array(image.as_array().to_owned())?)
    }

    fn kernel_shape(name: &str) -> PyResult<KernelShape> {
        match name {
            "rect" => Ok(KernelShape::Rect),
            "ellipse" => Ok(KernelShape::Ellipse),
            other => Err(pyo3::exceptions::PyValueError::new_err(format!(
                "unknown kernel shape `{other}`, expected `rect` or `ellipse`"
            ))),
        }
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Binarize a grayscale image: pixels >= threshold become 255, others 0.
    #[pyfunction]
    pub fn binarize<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        threshold: i32,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = to_raster(&image)?;
        let result = binarize_raster(&input, threshold)?;
        Ok(result.into_array().into_pyarray(py))
    }

    /// Grayscale dilation (local maximum) with a (2r+1) structuring element.
    #[pyfunction]
    #[pyo3(signature = (image, radius=2, shape="rect"))]
    pub fn dilate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
        shape: &str,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = to_raster(&image)?;
        let element = StructuringElement::new(kernel_shape(shape)?, radius)?;
        Ok(morphology::dilate(&input, &element).into_array().into_pyarray(py))
    }

    /// Grayscale erosion (local minimum) with a (2r+1) structuring element.
    #[pyfunction]
    #[pyo3(signature = (image, radius=2, shape="rect"))]
    pub fn erode<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
        shape: &str,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = to_raster(&image)?;
        let element = StructuringElement::new(kernel_shape(shape)?, radius)?;
        Ok(morphology::erode(&input, &element).into_array().into_pyarray(py))
    }

    /// dilate(image) - image, saturating at 0.
    #[pyfunction]
    #[pyo3(signature = (image, radius=2))]
    pub fn suppress_background<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = to_raster(&image)?;
        let result = morphology::suppress_background(input, radius)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Full pipeline
    // ========================================================================

    /// Run the whole ROI extraction on an already-loaded grayscale image.
    ///
    /// # Arguments
    /// * `image` - Grayscale image (height, width)
    /// * `crop` - (x, y, width, height) of the region to keep
    /// * `threshold` - Binarization level (0-255)
    /// * `seeds` - Flood-fill seeds as (x, y) in crop coordinates
    /// * `kernel_radius` - Background-estimate radius
    #[pyfunction]
    #[pyo3(signature = (image, crop, threshold, seeds, kernel_radius=2))]
    pub fn extract_roi<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        crop: (i32, i32, i32, i32),
        threshold: i32,
        seeds: Vec<(i32, i32)>,
        kernel_radius: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = to_raster(&image)?;
        let metadata = ImageMetadata {
            crop: Rectangle::new(crop.0, crop.1, crop.2, crop.3),
            threshold,
            seeds: seeds.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
        };
        let pipeline = RoiPipeline::new(PipelineConfig {
            kernel_radius,
            ..PipelineConfig::default()
        })?;
        let output = py.allow_threads(|| pipeline.run(&input, &metadata))?;
        Ok(output.into_array().into_pyarray(py))
    }

    #[pymodule]
    pub fn specimen_roi(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Filters
        m.add_function(wrap_pyfunction!(binarize, m)?)?;
        m.add_function(wrap_pyfunction!(dilate, m)?)?;
        m.add_function(wrap_pyfunction!(erode, m)?)?;
        m.add_function(wrap_pyfunction!(suppress_background, m)?)?;

        // Pipeline
        m.add_function(wrap_pyfunction!(extract_roi, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::specimen_roi;
