//! Integer geometry primitives: points, rectangles and closed polygons.
//!
//! Coordinates are pixel indices with `x` growing to the right and `y`
//! growing downwards.

use serde::{Deserialize, Serialize};

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Twice the signed area of the triangle `(o, a, b)`.
///
/// Positive when `o -> a -> b` turns counter-clockwise in raw coordinates.
#[inline]
pub fn cross(o: Point, a: Point, b: Point) -> i64 {
    let (ax, ay) = (a.x as i64 - o.x as i64, a.y as i64 - o.y as i64);
    let (bx, by) = (b.x as i64 - o.x as i64, b.y as i64 - o.y as i64);
    ax * by - ay * bx
}

/// Axis-aligned rectangle, used as a crop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle is non-empty and lies entirely inside a
    /// `width` x `height` raster.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        if self.x < 0 || self.y < 0 || self.width <= 0 || self.height <= 0 {
            return false;
        }
        let right = self.x as i64 + self.width as i64;
        let bottom = self.y as i64 + self.height as i64;
        right <= width as i64 && bottom <= height as i64
    }
}

/// Twice the signed shoelace area of a closed point sequence.
fn doubled_signed_area(points: &[Point]) -> i64 {
    if points.len() < 3 {
        return 0;
    }
    let n = points.len();
    (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
        })
        .sum()
}

/// A closed boundary produced by the contour tracer.
///
/// Always holds at least one point. Contours with fewer than three points
/// are valid but enclose no area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shoelace signed area; the sign depends on the traversal direction.
    pub fn signed_area(&self) -> f64 {
        doubled_signed_area(&self.0) as f64 / 2.0
    }

    /// Enclosed area, always `>= 0`.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// A convex polygon with counter-clockwise vertex order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn area(&self) -> f64 {
        (doubled_signed_area(&self.0) as f64 / 2.0).abs()
    }

    /// True when `p` is inside the polygon or on its boundary.
    ///
    /// Only meaningful for convex, counter-clockwise polygons such as those
    /// returned by [`crate::selection::hull::convex_hull`]. Degenerate
    /// polygons (a point or a segment) contain exactly their own points.
    pub fn contains(&self, p: Point) -> bool {
        match self.0.as_slice() {
            [] => false,
            [a] => *a == p,
            [a, b] => on_segment(*a, *b, p),
            vertices => {
                let n = vertices.len();
                (0..n).all(|i| cross(vertices[i], vertices[(i + 1) % n], p) >= 0)
            }
        }
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    cross(a, b, p) == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_square_area_either_winding() {
        let ccw = Contour::new(pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]));
        let cw = Contour::new(pts(&[(0, 0), (0, 4), (4, 4), (4, 0)]));
        assert_eq!(ccw.area(), 16.0);
        assert_eq!(cw.area(), 16.0);
        assert_eq!(ccw.signed_area(), -cw.signed_area());
    }

    #[test]
    fn test_degenerate_contours_have_zero_area() {
        assert_eq!(Contour::new(pts(&[(3, 3)])).area(), 0.0);
        assert_eq!(Contour::new(pts(&[(0, 0), (5, 5)])).area(), 0.0);
        assert_eq!(Contour::new(pts(&[(0, 0), (2, 2), (4, 4), (1, 1)])).area(), 0.0);
    }

    #[test]
    fn test_rectangle_fits_within() {
        assert!(Rectangle::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(Rectangle::new(2, 3, 8, 7).fits_within(10, 10));
        assert!(!Rectangle::new(2, 3, 9, 7).fits_within(10, 10));
        assert!(!Rectangle::new(-1, 0, 5, 5).fits_within(10, 10));
        assert!(!Rectangle::new(0, 0, 0, 5).fits_within(10, 10));
    }

    #[test]
    fn test_polygon_contains() {
        let square = Polygon::new(pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]));
        assert!(square.contains(Point::new(2, 2)));
        assert!(square.contains(Point::new(4, 2)));
        assert!(!square.contains(Point::new(5, 2)));

        let segment = Polygon::new(pts(&[(0, 0), (4, 4)]));
        assert!(segment.contains(Point::new(2, 2)));
        assert!(!segment.contains(Point::new(2, 3)));
    }
}
