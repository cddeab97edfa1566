//! Convex hull of a point set (Andrew's monotone chain).

use crate::geometry::{cross, Point, Polygon};

/// Compute the convex hull of `points`.
///
/// Vertices come out counter-clockwise (positive shoelace orientation in raw
/// pixel coordinates), starting at the point with the smallest `y`, ties
/// broken by smallest `x`. Duplicates and collinear vertices are dropped, so
/// degenerate input gives a single point or a two-point segment.
pub fn convex_hull(points: &[Point]) -> Polygon {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.len() <= 2 {
        return Polygon::new(start_at_lowest(sorted));
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);

    Polygon::new(start_at_lowest(lower))
}

fn start_at_lowest(mut vertices: Vec<Point>) -> Vec<Point> {
    if let Some(start) = vertices
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.y, p.x))
        .map(|(i, _)| i)
    {
        vertices.rotate_left(start);
    }
    vertices
}
