//! Mask composition: erase the hull from the flood mask, then merge the
//! original intensities back in.

use crate::error::{Result, RoiError};
use crate::geometry::{Point, Polygon};
use crate::raster::Raster;

/// Erase `hull` from `mask` with `erase_value`, then OR `original` into it.
///
/// Outside the hull the flood mask dominates; inside it (with an erase value
/// of 0) the original pixels come through unchanged.
pub fn compose(original: &Raster, mut mask: Raster, hull: &Polygon, erase_value: u8) -> Result<Raster> {
    check_same_size(original, &mask)?;
    fill_convex_polygon(&mut mask, hull, erase_value);
    bitwise_or(original, &mask)
}

/// Pixel-wise `a | b`.
pub fn bitwise_or(a: &Raster, b: &Raster) -> Result<Raster> {
    check_same_size(a, b)?;
    let mut out = a.as_array().to_owned();
    out.zip_mut_with(&b.as_array(), |px, &other| *px |= other);
    Ok(Raster::from_valid(out))
}

fn check_same_size(a: &Raster, b: &Raster) -> Result<()> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(RoiError::invalid(
            "mask",
            format!(
                "size {}x{} does not match original {}x{}",
                b.width(),
                b.height(),
                a.width(),
                a.height()
            ),
        ));
    }
    Ok(())
}

/// Paint a convex polygon, interior and boundary, with `value`.
///
/// A one-vertex polygon paints a pixel and a two-vertex polygon a line.
/// Parts outside the raster are clipped.
pub fn fill_convex_polygon(raster: &mut Raster, polygon: &Polygon, value: u8) {
    let vertices = polygon.vertices();
    let n = vertices.len();
    if n == 0 {
        return;
    }

    for i in 0..n {
        draw_line(raster, vertices[i], vertices[(i + 1) % n], value);
    }
    if n < 3 {
        return;
    }

    let min_y = vertices.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = vertices
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(-1)
        .min(raster.height() as i32 - 1);
    let last_x = raster.width() as i32 - 1;

    for y in min_y..=max_y {
        let Some((left, right)) = row_extent(vertices, y) else {
            continue;
        };
        let start = left.max(0);
        let end = right.min(last_x);
        for x in start..=end {
            raster.set(x as usize, y as usize, value);
        }
    }
}

/// First and last pixel column covered on row `y`.
///
/// Crossings are rational; the left one is rounded up and the right one
/// down, in exact integer arithmetic.
fn row_extent(vertices: &[Point], y: i32) -> Option<(i32, i32)> {
    let n = vertices.len();
    let mut extent: Option<(i32, i32)> = None;

    for i in 0..n {
        let (a, b) = (vertices[i], vertices[(i + 1) % n]);
        if y < a.y.min(b.y) || y > a.y.max(b.y) {
            continue;
        }
        let (lo, hi) = if a.y == b.y {
            (a.x.min(b.x), a.x.max(b.x))
        } else {
            let mut num = (y - a.y) as i64 * (b.x - a.x) as i64;
            let mut den = (b.y - a.y) as i64;
            if den < 0 {
                num = -num;
                den = -den;
            }
            let floor = a.x as i64 + num.div_euclid(den);
            let ceil = a.x as i64 - (-num).div_euclid(den);
            (ceil as i32, floor as i32)
        };
        extent = Some(match extent {
            Some((left, right)) => (left.min(lo), right.max(hi)),
            None => (lo, hi),
        });
    }

    extent
}

/// Bresenham line, endpoints included.
fn draw_line(raster: &mut Raster, from: Point, to: Point, value: u8) {
    let (mut x, mut y) = (from.x, from.y);
    let dx = (to.x - x).abs();
    let dy = -(to.y - y).abs();
    let sx = if x < to.x { 1 } else { -1 };
    let sy = if y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if raster.contains(Point::new(x, y)) {
            raster.set(x as usize, y as usize, value);
        }
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
