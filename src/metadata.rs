//! Per-image metadata: crop rectangle, threshold and flood-fill seeds.
//!
//! The YAML layout is keyed by image identifier:
//!
//! ```yaml
//! %YAML:1.0
//! leaf_01:
//!   crop: { x: 120, y: 40, width: 800, height: 600 }
//!   threshold: 110
//!   filler:
//!     - { x: 0, y: 0 }
//!     - { x: 799, y: 599 }
//! ```
//!
//! The `%YAML:1.0` directive written by OpenCV's `FileStorage` is accepted.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{Result, RoiError};
use crate::geometry::{Point, Rectangle};

/// Everything the pipeline needs to know about one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub crop: Rectangle,
    pub threshold: i32,
    /// Flood-fill seeds, in crop coordinates, applied in order.
    #[serde(rename = "filler")]
    pub seeds: Vec<Point>,
}

/// Keyed metadata lookup.
pub trait MetadataSource: Send + Sync {
    /// # Errors
    /// `MetadataMissing` when `id` is unknown, `MetadataInvalid` when its
    /// entry cannot be read.
    fn lookup(&self, id: &str) -> Result<ImageMetadata>;
}

/// Metadata held in memory, mostly useful for tests and bindings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    entries: HashMap<String, ImageMetadata>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, metadata: ImageMetadata) {
        self.entries.insert(id.into(), metadata);
    }
}

impl MetadataSource for InMemoryMetadata {
    fn lookup(&self, id: &str) -> Result<ImageMetadata> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| RoiError::MetadataMissing { id: id.to_string() })
    }
}

/// Metadata read from a YAML document.
///
/// Entries are decoded on lookup, so one malformed entry only fails the
/// images that use it.
#[derive(Debug, Clone, Default)]
pub struct YamlMetadataStore {
    entries: HashMap<String, Value>,
}

impl YamlMetadataStore {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| RoiError::MetadataInvalid {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let body = strip_directives(contents);
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries: HashMap<String, Value> =
            serde_yaml::from_str(&body).map_err(|e| RoiError::MetadataInvalid {
                reason: e.to_string(),
            })?;
        log::debug!("loaded metadata for {} image(s)", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl MetadataSource for YamlMetadataStore {
    fn lookup(&self, id: &str) -> Result<ImageMetadata> {
        let value = self
            .entries
            .get(id)
            .ok_or_else(|| RoiError::MetadataMissing { id: id.to_string() })?;
        serde_yaml::from_value(value.clone()).map_err(|e| RoiError::MetadataInvalid {
            reason: format!("entry `{id}`: {e}"),
        })
    }
}

/// Drop the leading `%` directive lines such as `%YAML:1.0`, which
/// serde_yaml rejects. Directives end at the first other non-blank line.
fn strip_directives(contents: &str) -> String {
    let mut in_header = true;
    contents
        .lines()
        .filter(|line| {
            if in_header {
                if line.starts_with('%') {
                    return false;
                }
                if !line.trim().is_empty() {
                    in_header = false;
                }
            }
            true
        })
        .collect::<Vec<_>>()
        .join("\n")
}
