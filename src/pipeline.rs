//! ROI extraction pipeline.
//!
//! One run takes a grayscale image and its metadata through:
//!
//! 1. crop to the metadata rectangle (the crop is kept as the "original")
//! 2. binarize at the metadata threshold
//! 3. trace contours and pick the largest region
//! 4. convex hull of that region
//! 5. flood fill the binary mask from the metadata seeds
//! 6. erase the hull from the mask and OR the original back in
//! 7. dilate and subtract to suppress the background
//!
//! Each stage owns the buffer it works on and hands it to the next one.
//! Runs share no mutable state, which makes [`RoiPipeline::run_batch`] safe
//! to spread across threads.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::filters::morphology::{
    check_radius, suppress_background_with, KernelShape, StructuringElement,
};
use crate::filters::threshold::{binarize, checked_threshold};
use crate::geometry::Polygon;
use crate::io::ImageSource;
use crate::metadata::{ImageMetadata, MetadataSource};
use crate::raster::Raster;
use crate::selection::contour::{trace_with, ChainApprox, ContourSet};
use crate::selection::{compose, convex_hull, flood_fill, select_largest};

/// Tunables that stay fixed across images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Radius `r` of the `(2r+1)` structuring element used for the background estimate.
    pub kernel_radius: usize,
    pub kernel_shape: KernelShape,
    /// Value painted by the exterior flood fill.
    pub fill_value: u8,
    /// Value the hull is painted with before merging the original back in.
    pub erase_value: u8,
    /// Exclude contour 0 (the raster frame) when picking the largest region.
    pub skip_first_contour: bool,
    pub chain_approx: ChainApprox,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kernel_radius: 2,
            kernel_shape: KernelShape::Rect,
            fill_value: 255,
            erase_value: 0,
            skip_first_contour: true,
            chain_approx: ChainApprox::Simple,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML config; absent keys keep their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(contents).map_err(|e| RoiError::invalid("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `InvalidParameter { name: "kernel_radius" }` for an oversized radius.
    pub fn validate(&self) -> Result<()> {
        check_radius(self.kernel_radius).map(|_| ())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RoiError::invalid("config", format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }
}

/// Output of a run together with every intermediate stage.
#[derive(Debug, Clone)]
pub struct RoiResult {
    /// Cropped input, before thresholding.
    pub cropped: Raster,
    pub binary: Raster,
    pub contours: ContourSet,
    /// Index into `contours` of the region the hull was built from.
    pub selected: usize,
    pub hull: Polygon,
    /// Original pixels inside the hull, flood mask outside.
    pub composite: Raster,
    pub output: Raster,
}

/// One image of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub id: String,
    pub path: PathBuf,
}

impl BatchJob {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoiPipeline {
    config: PipelineConfig,
    element: StructuringElement,
}

impl Default for RoiPipeline {
    fn default() -> Self {
        let config = PipelineConfig::default();
        let element = StructuringElement::build(config.kernel_shape, config.kernel_radius);
        Self { config, element }
    }
}

impl RoiPipeline {
    /// # Errors
    /// `InvalidParameter` when the config does not validate.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let element = StructuringElement::new(config.kernel_shape, config.kernel_radius)?;
        Ok(Self { config, element })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract the ROI of `image` and return the background-suppressed result.
    pub fn run(&self, image: &Raster, metadata: &ImageMetadata) -> Result<Raster> {
        self.run_detailed(image, metadata).map(|result| result.output)
    }

    /// Like [`run`](Self::run), keeping every intermediate raster.
    pub fn run_detailed(&self, image: &Raster, metadata: &ImageMetadata) -> Result<RoiResult> {
        // Reject a bad threshold before spending time on the crop.
        checked_threshold(metadata.threshold)?;

        let cropped = image.crop(&metadata.crop)?;
        debug!(
            "cropped {}x{} -> {}x{}",
            image.width(),
            image.height(),
            cropped.width(),
            cropped.height()
        );

        let binary = binarize(&cropped, metadata.threshold)?;

        let contours = trace_with(&binary, self.config.chain_approx);
        debug!("traced {} contour(s)", contours.len());

        let selected = select_largest(contours.contours(), self.config.skip_first_contour)?;
        let hull = convex_hull(contours.contours()[selected].points());
        debug!("hull of contour #{selected} has {} vertices", hull.len());

        let mask = flood_fill(binary.clone(), &metadata.seeds, self.config.fill_value)?;
        let composite = compose(&cropped, mask, &hull, self.config.erase_value)?;
        let output = suppress_background_with(composite.clone(), &self.element);

        Ok(RoiResult {
            cropped,
            binary,
            contours,
            selected,
            hull,
            composite,
            output,
        })
    }

    /// Look up metadata for `id`, load `path`, then run.
    ///
    /// Metadata is resolved before the image is read, and both before any
    /// stage runs.
    pub fn run_source(
        &self,
        metadata: &dyn MetadataSource,
        images: &dyn ImageSource,
        id: &str,
        path: &Path,
    ) -> Result<Raster> {
        let meta = metadata.lookup(id)?;
        let image = images.load(path)?;
        info!(
            "extracting ROI of `{id}` ({}x{}, threshold {}, {} seed(s))",
            image.width(),
            image.height(),
            meta.threshold,
            meta.seeds.len()
        );
        self.run(&image, &meta)
    }

    /// Run independent images in parallel; results keep the order of `jobs`.
    pub fn run_batch(
        &self,
        metadata: &dyn MetadataSource,
        images: &dyn ImageSource,
        jobs: &[BatchJob],
    ) -> Vec<Result<Raster>> {
        jobs.par_iter()
            .map(|job| self.run_source(metadata, images, &job.id, &job.path))
            .collect()
    }
}
