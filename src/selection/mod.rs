//! Region selection algorithms.
//!
//! This module provides the geometric half of ROI extraction:
//! - **Contour tracing**: Suzuki–Abe border following with nesting
//! - **Largest region**: picks the contour enclosing the most area
//! - **Convex hull**: monotone chain hull of the chosen contour
//! - **Flood fill**: seeded equal-intensity fill of the exterior
//! - **Mask composition**: hull erase and merge with the original pixels

pub mod contour;
pub mod flood_fill;
pub mod hull;
pub mod largest;
pub mod mask;

pub use contour::{trace, trace_with, BorderKind, ChainApprox, ContourSet, HierarchyNode};
pub use flood_fill::{flood_fill, flood_fill_region, FillRegion};
pub use hull::convex_hull;
pub use largest::select_largest;
pub use mask::{bitwise_or, compose, fill_convex_polygon};
