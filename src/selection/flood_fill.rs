//! Seeded flood fill over equal-intensity regions.
//!
//! Each seed grows a 4-connected region of pixels sharing the seed's value
//! and paints it with the fill value. Seeds are applied one after another on
//! the same raster, so a later seed sees what earlier seeds painted.

use std::collections::VecDeque;

use crate::error::{Result, RoiError};
use crate::geometry::Point;
use crate::raster::Raster;

/// Flood fill result with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRegion {
    /// Number of pixels repainted
    pub pixel_count: usize,
    /// Bounds of the repainted region
    pub bounds: Option<(usize, usize, usize, usize)>, // (x, y, width, height)
}

/// Fill from every seed in order and return the repainted raster.
///
/// All seeds are bounds-checked before any pixel changes.
///
/// # Errors
/// `SeedOutOfBounds` for the first seed lying outside the raster.
pub fn flood_fill(raster: Raster, seeds: &[Point], fill_value: u8) -> Result<Raster> {
    check_seeds(&raster, seeds)?;
    Ok(seeds.iter().fold(raster, |mut acc, &seed| {
        let region = fill_from(&mut acc, seed, fill_value);
        log::debug!(
            "seed ({}, {}) repainted {} pixel(s)",
            seed.x,
            seed.y,
            region.pixel_count
        );
        acc
    }))
}

/// Fill a single seed in place and report what changed.
pub fn flood_fill_region(raster: &mut Raster, seed: Point, fill_value: u8) -> Result<FillRegion> {
    check_seeds(raster, &[seed])?;
    Ok(fill_from(raster, seed, fill_value))
}

fn check_seeds(raster: &Raster, seeds: &[Point]) -> Result<()> {
    match seeds.iter().find(|&&seed| !raster.contains(seed)) {
        Some(&seed) => Err(RoiError::SeedOutOfBounds {
            seed,
            width: raster.width(),
            height: raster.height(),
        }),
        None => Ok(()),
    }
}

fn fill_from(raster: &mut Raster, seed: Point, fill_value: u8) -> FillRegion {
    let (start_x, start_y) = (seed.x as usize, seed.y as usize);
    let mut pixels = raster.as_array_mut();
    let (height, width) = pixels.dim();

    let target = pixels[[start_y, start_x]];
    if target == fill_value {
        // Painting a region with its own value changes nothing.
        return FillRegion {
            pixel_count: 0,
            bounds: None,
        };
    }

    let mut pixel_count = 0;
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;

    // Repainted pixels no longer match `target`, so they double as the
    // visited set.
    let mut queue = VecDeque::new();
    pixels[[start_y, start_x]] = fill_value;
    queue.push_back((start_x, start_y));

    while let Some((x, y)) = queue.pop_front() {
        pixel_count += 1;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if pixels[[ny, nx]] == target {
                pixels[[ny, nx]] = fill_value;
                queue.push_back((nx, ny));
            }
        }
    }

    FillRegion {
        pixel_count,
        bounds: Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[u8]]) -> Raster {
        let width = rows[0].len();
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Raster::from_vec(width, rows.len(), data).unwrap()
    }

    #[test]
    fn test_single_value_fill() {
        let raster = Raster::new(5, 5, 0).unwrap();
        let out = flood_fill(raster, &[Point::new(2, 2)], 255).unwrap();
        assert!(out.as_array().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_two_regions() {
        let raster = from_rows(&[&[0, 0, 9, 9], &[0, 0, 9, 9], &[0, 0, 9, 9], &[0, 0, 9, 9]]);
        let mut out = raster.clone();
        let region = flood_fill_region(&mut out, Point::new(0, 0), 200).unwrap();
        assert_eq!(region.pixel_count, 8);
        assert_eq!(region.bounds, Some((0, 0, 2, 4)));
        assert_eq!(out.get(1, 3), Some(200));
        assert_eq!(out.get(2, 0), Some(9));
    }

    #[test]
    fn test_four_connectivity_stops_at_diagonals() {
        let raster = from_rows(&[&[0, 5, 5], &[5, 0, 5], &[5, 5, 0]]);
        let out = flood_fill(raster, &[Point::new(0, 0)], 1).unwrap();
        assert_eq!(out.get(0, 0), Some(1));
        assert_eq!(out.get(1, 1), Some(0));
        assert_eq!(out.get(2, 2), Some(0));
    }

    #[test]
    fn test_connectivity_property() {
        // Two 0-regions separated by a wall of 7s; only the seeded one changes.
        let raster = from_rows(&[
            &[0, 0, 7, 0, 0],
            &[0, 0, 7, 0, 0],
            &[7, 7, 7, 0, 3],
            &[0, 0, 7, 0, 0],
        ]);
        let out = flood_fill(raster.clone(), &[Point::new(4, 0)], 128).unwrap();
        for y in 0..4 {
            for x in 0..5 {
                let before = raster.get(x, y).unwrap();
                let reachable = x >= 3 && before == 0;
                let expected = if reachable { 128 } else { before };
                assert_eq!(out.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_seeds_apply_in_order() {
        let raster = from_rows(&[&[0, 0, 4, 4]]);
        // The second seed hits a pixel the first one already painted.
        let out = flood_fill(raster, &[Point::new(0, 0), Point::new(1, 0), Point::new(3, 0)], 4).unwrap();
        assert_eq!(out.into_raw(), vec![4, 4, 4, 4]);
    }

    #[test]
    fn test_seed_out_of_bounds_is_atomic() {
        let raster = Raster::new(3, 3, 0).unwrap();
        let err = flood_fill(raster, &[Point::new(1, 1), Point::new(3, 0)], 9).unwrap_err();
        assert_eq!(
            err,
            RoiError::SeedOutOfBounds {
                seed: Point::new(3, 0),
                width: 3,
                height: 3
            }
        );
        let mut raster = Raster::new(3, 3, 0).unwrap();
        assert!(flood_fill_region(&mut raster, Point::new(-1, 0), 9).is_err());
        assert!(raster.as_array().iter().all(|&v| v == 0));
    }
}
