//! Contour extraction from binary rasters.
//!
//! Implements Suzuki–Abe border following over 8-connected foreground
//! pixels (any non-zero value). The raster is treated as surrounded by a
//! one-pixel background frame, and that frame is reported as contour 0:
//!
//! - an all-background raster yields exactly one contour, the frame;
//! - an all-foreground raster yields the frame plus one outer border running
//!   along the raster edge.
//!
//! Borders are discovered in raster-scan order (top-to-bottom,
//! left-to-right), so the output is fully deterministic.

use serde::{Deserialize, Serialize};

use crate::geometry::{Contour, Point};
use crate::raster::Raster;

/// Whether a traced border encloses foreground or background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// The implicit border around the whole raster.
    Frame,
    /// Boundary between a foreground component and the background around it.
    Outer,
    /// Boundary between a foreground component and a hole inside it.
    Hole,
}

impl BorderKind {
    /// The frame behaves as a hole border when deciding parenthood.
    fn is_hole_like(self) -> bool {
        matches!(self, BorderKind::Frame | BorderKind::Hole)
    }
}

/// Tree links of one contour, as indices into the contour list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HierarchyNode {
    pub next: Option<usize>,
    pub prev: Option<usize>,
    pub first_child: Option<usize>,
    pub parent: Option<usize>,
}

/// How many border pixels are kept per contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainApprox {
    /// Every border pixel.
    None,
    /// Only the end points of horizontal, vertical and diagonal runs.
    #[default]
    Simple,
}

/// Traced contours with their kinds and nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSet {
    contours: Vec<Contour>,
    kinds: Vec<BorderKind>,
    hierarchy: Vec<HierarchyNode>,
}

impl ContourSet {
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn hierarchy(&self) -> &[HierarchyNode] {
        &self.hierarchy
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    pub fn kind(&self, index: usize) -> Option<BorderKind> {
        self.kinds.get(index).copied()
    }

    /// Direct children of `index`, in discovery order.
    pub fn children(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = self.hierarchy.get(index).and_then(|n| n.first_child);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.hierarchy[child].next;
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    pub fn into_contours(self) -> Vec<Contour> {
        self.contours
    }
}

/// Trace all borders of `binary` with [`ChainApprox::Simple`].
pub fn trace(binary: &Raster) -> ContourSet {
    trace_with(binary, ChainApprox::Simple)
}

/// Neighbor offsets in clockwise order (y grows downwards), starting east.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),   // 0: E
    (1, 1),   // 1: SE
    (0, 1),   // 2: S
    (-1, 1),  // 3: SW
    (-1, 0),  // 4: W
    (-1, -1), // 5: NW
    (0, -1),  // 6: N
    (1, -1),  // 7: NE
];

fn direction_of(from: (i32, i32), to: (i32, i32)) -> usize {
    let delta = (to.0 - from.0, to.1 - from.1);
    DIRECTIONS
        .iter()
        .position(|&d| d == delta)
        .unwrap_or(0)
}

/// Label image padded by one background pixel on every side.
///
/// Values: 0 background, 1 unvisited foreground, `±nbd` for pixels on the
/// border numbered `nbd` (negative when the pixel's east neighbor is
/// background).
struct Labels {
    width: i32,
    data: Vec<i32>,
}

impl Labels {
    fn new(binary: &Raster) -> Self {
        let width = binary.width() + 2;
        let height = binary.height() + 2;
        let mut data = vec![0i32; width * height];
        for ((y, x), &v) in binary.as_array().indexed_iter() {
            if v != 0 {
                data[(y + 1) * width + x + 1] = 1;
            }
        }
        Self {
            width: width as i32,
            data,
        }
    }

    #[inline]
    fn at(&self, p: (i32, i32)) -> i32 {
        self.data[(p.1 * self.width + p.0) as usize]
    }

    #[inline]
    fn set(&mut self, p: (i32, i32), value: i32) {
        self.data[(p.1 * self.width + p.0) as usize] = value;
    }
}

/// Trace all borders of `binary`.
pub fn trace_with(binary: &Raster, approx: ChainApprox) -> ContourSet {
    let (width, height) = (binary.width() as i32, binary.height() as i32);
    let mut labels = Labels::new(binary);

    let mut contours = vec![Contour::new(frame_points(width, height))];
    let mut kinds = vec![BorderKind::Frame];
    let mut parents: Vec<Option<usize>> = vec![None];
    let mut nbd = 1i32;

    for y in 1..=height {
        // Border number of the last border met on this row; the frame is 1.
        let mut lnbd = 1i32;
        for x in 1..=width {
            let v = labels.at((x, y));
            if v == 0 {
                continue;
            }

            let start = if v == 1 && labels.at((x - 1, y)) == 0 {
                Some((BorderKind::Outer, (x - 1, y)))
            } else if v >= 1 && labels.at((x + 1, y)) == 0 {
                if v > 1 {
                    lnbd = v;
                }
                Some((BorderKind::Hole, (x + 1, y)))
            } else {
                None
            };

            if let Some((kind, from)) = start {
                nbd += 1;
                let neighbor = (lnbd - 1) as usize;
                let parent = if kind.is_hole_like() == kinds[neighbor].is_hole_like() {
                    parents[neighbor]
                } else {
                    Some(neighbor)
                };

                let points = follow_border(&mut labels, (x, y), from, nbd);
                let points = match approx {
                    ChainApprox::None => points,
                    ChainApprox::Simple => compress_runs(points),
                };
                contours.push(Contour::new(points));
                kinds.push(kind);
                parents.push(parent);
            }

            let v = labels.at((x, y));
            if v != 1 {
                lnbd = v.abs();
            }
        }
    }

    let hierarchy = link_hierarchy(&parents);
    ContourSet {
        contours,
        kinds,
        hierarchy,
    }
}

/// Corners of the raster rectangle with repeated corners collapsed.
fn frame_points(width: i32, height: i32) -> Vec<Point> {
    let (right, bottom) = (width - 1, height - 1);
    let mut points = vec![
        Point::new(0, 0),
        Point::new(0, bottom),
        Point::new(right, bottom),
        Point::new(right, 0),
    ];
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Follow one border starting at `start`, entered from background pixel `from`.
///
/// Coordinates are in padded label space; returned points are in raster
/// space.
fn follow_border(labels: &mut Labels, start: (i32, i32), from: (i32, i32), nbd: i32) -> Vec<Point> {
    let to_point = |p: (i32, i32)| Point::new(p.0 - 1, p.1 - 1);
    let step = |p: (i32, i32), d: usize| (p.0 + DIRECTIONS[d].0, p.1 + DIRECTIONS[d].1);

    // Clockwise search for the first foreground neighbor.
    let first_dir = direction_of(start, from);
    let first = (0..8)
        .map(|k| step(start, (first_dir + k) % 8))
        .find(|&p| labels.at(p) != 0);

    let Some(first) = first else {
        // Isolated pixel.
        labels.set(start, -nbd);
        return vec![to_point(start)];
    };

    let mut points = Vec::new();
    let mut prev = first;
    let mut current = start;
    loop {
        // Counter-clockwise search around `current`, starting just after `prev`.
        let prev_dir = direction_of(current, prev);
        let mut east_is_background = false;
        let mut next = prev;
        for k in 1..=8 {
            let d = (prev_dir + 8 - k) % 8;
            let candidate = step(current, d);
            if labels.at(candidate) != 0 {
                next = candidate;
                break;
            }
            if d == 0 {
                east_is_background = true;
            }
        }

        if east_is_background {
            labels.set(current, -nbd);
        } else if labels.at(current) == 1 {
            labels.set(current, nbd);
        }
        points.push(to_point(current));

        if next == start && current == first {
            break;
        }
        prev = current;
        current = next;
    }

    points
}

/// Drop points lying in the middle of a straight run, keeping run ends.
fn compress_runs(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}

/// Build sibling and child links from parent indices, preserving discovery
/// order among siblings.
fn link_hierarchy(parents: &[Option<usize>]) -> Vec<HierarchyNode> {
    let mut nodes = vec![HierarchyNode::default(); parents.len()];
    let mut last_child: Vec<Option<usize>> = vec![None; parents.len()];
    let mut last_root: Option<usize> = None;

    for (index, &parent) in parents.iter().enumerate() {
        nodes[index].parent = parent;
        let previous = match parent {
            Some(p) => {
                if nodes[p].first_child.is_none() {
                    nodes[p].first_child = Some(index);
                }
                last_child[p].replace(index)
            }
            None => last_root.replace(index),
        };
        if let Some(previous) = previous {
            nodes[previous].next = Some(index);
            nodes[index].prev = Some(previous);
        }
    }

    nodes
}
