//! Pick the contour enclosing the largest area.

use crate::error::{Result, RoiError};
use crate::geometry::Contour;

/// Index of the contour with the largest absolute shoelace area.
///
/// With `skip_first`, contour 0 never takes part: the tracer in
/// [`crate::selection::contour`] always reports the raster frame first, and
/// the frame would otherwise win every time. A tracer that does not emit a
/// frame must be paired with `skip_first = false`, or a real region is lost.
///
/// Ties keep the lowest index. When every candidate has zero area the first
/// candidate is returned.
///
/// # Errors
/// `NoContourFound` when there is no candidate left, i.e. fewer than two
/// contours with `skip_first`, or none without.
pub fn select_largest(contours: &[Contour], skip_first: bool) -> Result<usize> {
    let first = usize::from(skip_first);
    if contours.len() <= first {
        return Err(RoiError::NoContourFound {
            found: contours.len(),
        });
    }

    let mut best = first;
    let mut best_area = contours[first].area();
    for (index, contour) in contours.iter().enumerate().skip(first + 1) {
        let area = contour.area();
        if area > best_area {
            best = index;
            best_area = area;
        }
    }

    log::debug!("largest contour #{best} of {} (area {best_area})", contours.len());
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn square(origin: i32, side: i32) -> Contour {
        let (a, b) = (origin, origin + side);
        Contour::new(vec![
            Point::new(a, a),
            Point::new(a, b),
            Point::new(b, b),
            Point::new(b, a),
        ])
    }

    #[test]
    fn test_skip_first_ignores_frame() {
        let contours = vec![square(0, 100), square(10, 5), square(40, 20), square(70, 3)];
        assert_eq!(select_largest(&contours, true).unwrap(), 2);
        assert_eq!(select_largest(&contours, false).unwrap(), 0);
    }

    #[test]
    fn test_ties_keep_lowest_index() {
        let contours = vec![square(0, 50), square(1, 4), square(20, 4)];
        assert_eq!(select_largest(&contours, true).unwrap(), 1);
    }

    #[test]
    fn test_zero_area_candidates_return_first_candidate() {
        let dot = Contour::new(vec![Point::new(3, 3)]);
        let contours = vec![square(0, 9), dot.clone(), dot];
        assert_eq!(select_largest(&contours, true).unwrap(), 1);
    }

    #[test]
    fn test_too_few_contours() {
        let err = select_largest(&[square(0, 9)], true).unwrap_err();
        assert_eq!(err, RoiError::NoContourFound { found: 1 });
        assert!(select_largest(&[], false).is_err());
        assert_eq!(select_largest(&[square(0, 9)], false).unwrap(), 0);
    }

    /// Without a leading frame contour, skipping index 0 drops the only
    /// real region. This pins that dependence on the tracer convention.
    #[test]
    fn test_skip_first_depends_on_frame_convention() {
        let without_frame = vec![square(40, 20), square(5, 2)];
        assert_eq!(select_largest(&without_frame, true).unwrap(), 1);
        assert_eq!(select_largest(&without_frame, false).unwrap(), 0);
    }
}
