//! Hull + polygon reduction of individual contours.

use nalgebra::Point2;
use peg_vision_core::{ContourGeometry, PointSequence};
use serde::{Deserialize, Serialize};

/// A contour reduced to its convex hull and a coarse polygon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedShape {
    pub hull: PointSequence,
    pub polygon: PointSequence,
    /// Polygon is a convex quadrilateral.
    pub rectangular: bool,
}

impl NormalizedShape {
    #[inline]
    pub fn vertices(&self) -> usize {
        self.polygon.len()
    }
}

/// Convex hull, then closed polygon approximation with `epsilon`.
pub fn normalize_shape<G>(geometry: &G, points: &[Point2<i32>], epsilon: f64) -> NormalizedShape
where
    G: ContourGeometry + ?Sized,
{
    let hull = geometry.convex_hull(points);
    let polygon = geometry.approx_polygon(&hull, epsilon, true);
    let rectangular = is_rectangular(geometry, &polygon);
    NormalizedShape {
        hull,
        polygon,
        rectangular,
    }
}

/// Exactly four vertices and convex.
pub fn is_rectangular<G>(geometry: &G, polygon: &[Point2<i32>]) -> bool
where
    G: ContourGeometry + ?Sized,
{
    polygon.len() == 4 && geometry.is_convex(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use peg_vision_core::PlanarGeometry;

    fn pts(raw: &[(i32, i32)]) -> PointSequence {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn quadrilateral_flags() {
        let g = PlanarGeometry;
        assert!(is_rectangular(&g, &pts(&[(0, 0), (40, 0), (40, 90), (0, 90)])));
        // tilted but convex still counts
        assert!(is_rectangular(&g, &pts(&[(0, 0), (20, 20), (20, 220), (0, 200)])));
        assert!(!is_rectangular(&g, &pts(&[(0, 0), (40, 0), (20, 90)])));
        assert!(!is_rectangular(
            &g,
            &pts(&[(0, 0), (40, 0), (60, 40), (40, 90), (0, 90)])
        ));
        assert!(!is_rectangular(&g, &pts(&[(0, 0), (100, 0), (20, 20), (0, 100)])));
    }

    #[test]
    fn noisy_strip_normalizes_to_four_corners() {
        // rectangle outline with a few jagged pixels along the long sides
        let contour = pts(&[
            (10, 10),
            (50, 10),
            (51, 60),
            (50, 110),
            (50, 160),
            (10, 160),
            (9, 110),
            (10, 60),
        ]);
        let shape = normalize_shape(&PlanarGeometry, &contour, 20.0);
        assert!(shape.rectangular, "polygon {:?}", shape.polygon);
        assert_eq!(shape.hull.len(), 6);
        assert_eq!(
            shape.polygon,
            pts(&[(10, 160), (10, 10), (50, 10), (50, 160)])
        );
    }

    #[test]
    fn triangle_is_not_rectangular() {
        let contour = pts(&[(0, 0), (100, 0), (50, 120)]);
        let shape = normalize_shape(&PlanarGeometry, &contour, 20.0);
        assert!(!shape.rectangular);
        assert_eq!(shape.vertices(), 3);
    }
}
