//! Piecewise-linear interpolation over a Delaunay triangulation.
//!
//! Control points are triangulated once with `delaunator`. Each triangle is
//! stored in an R-tree keyed by its bounding box so a query only runs the
//! barycentric test against the handful of triangles whose boxes contain it.
//! Queries outside the convex hull produce `NaN`.

use crate::{ControlPointSet, GeoPoint};
use rstar::{RTree, RTreeObject, AABB};

/// Barycentric weights down to this value still count as inside a triangle,
/// so points on shared edges and hull vertices are not lost to rounding.
const EDGE_TOLERANCE: f64 = 1e-12;

/// A triangle of the triangulation, indexed by its bounding box.
#[derive(Debug, Clone)]
struct TriangleEntry {
    /// Indices into the interpolant's vertex arrays.
    vertices: [usize; 3],
    min: [f64; 2],
    max: [f64; 2],
}

impl RTreeObject for TriangleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// Linear interpolant over the triangulated control points.
pub struct TriangulatedInterpolant {
    positions: Vec<[f64; 2]>,
    heights: Vec<f64>,
    triangles: RTree<TriangleEntry>,
}

impl std::fmt::Debug for TriangulatedInterpolant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangulatedInterpolant")
            .field("vertices", &self.positions.len())
            .field("triangles", &self.triangles.size())
            .finish()
    }
}

impl TriangulatedInterpolant {
    /// Triangulate a control-point set.
    ///
    /// Points with non-finite coordinates are left out. Fewer than three
    /// usable points, or points that are all collinear, give an interpolant
    /// with no triangles that returns `NaN` everywhere.
    pub fn new(points: &ControlPointSet) -> Self {
        let (positions, heights): (Vec<[f64; 2]>, Vec<f64>) = points
            .points()
            .iter()
            .filter(|p| p.position().is_finite())
            .map(|p| ([p.lon, p.lat], p.height))
            .unzip();

        let triangles = if positions.len() < 3 {
            RTree::new()
        } else {
            let delaunator_points: Vec<delaunator::Point> = positions
                .iter()
                .map(|p| delaunator::Point { x: p[0], y: p[1] })
                .collect();
            let triangulation = delaunator::triangulate(&delaunator_points);

            let entries: Vec<TriangleEntry> = triangulation
                .triangles
                .chunks_exact(3)
                .map(|tri| {
                    let vertices = [tri[0], tri[1], tri[2]];
                    let mut min = positions[vertices[0]];
                    let mut max = min;
                    for &v in &vertices[1..] {
                        let p = positions[v];
                        min = [min[0].min(p[0]), min[1].min(p[1])];
                        max = [max[0].max(p[0]), max[1].max(p[1])];
                    }
                    TriangleEntry { vertices, min, max }
                })
                .collect();
            RTree::bulk_load(entries)
        };

        Self {
            positions,
            heights,
            triangles,
        }
    }

    /// Number of triangles in the triangulation.
    pub fn triangle_count(&self) -> usize {
        self.triangles.size()
    }

    /// Whether no query can ever succeed (degenerate or too few points).
    pub fn is_degenerate(&self) -> bool {
        self.triangles.size() == 0
    }

    /// Interpolated height at a point, or `NaN` outside the convex hull.
    pub fn interpolate(&self, point: GeoPoint) -> f64 {
        if !point.is_finite() {
            return f64::NAN;
        }

        let query = AABB::from_point([point.lon, point.lat]);
        self.triangles
            .locate_in_envelope_intersecting(&query)
            .find_map(|tri| self.evaluate(tri, point))
            .unwrap_or(f64::NAN)
    }

    /// Evaluate the plane through a triangle if the point lies inside it.
    fn evaluate(&self, tri: &TriangleEntry, point: GeoPoint) -> Option<f64> {
        let [a, b, c] = tri.vertices.map(|v| self.positions[v]);

        let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
        if det == 0.0 {
            return None;
        }

        let dx = point.lon - c[0];
        let dy = point.lat - c[1];
        let w0 = ((b[1] - c[1]) * dx + (c[0] - b[0]) * dy) / det;
        let w1 = ((c[1] - a[1]) * dx + (a[0] - c[0]) * dy) / det;
        let w2 = 1.0 - w0 - w1;

        if w0 < -EDGE_TOLERANCE || w1 < -EDGE_TOLERANCE || w2 < -EDGE_TOLERANCE {
            return None;
        }

        let [ha, hb, hc] = tri.vertices.map(|v| self.heights[v]);
        Some(w0 * ha + w1 * hb + w2 * hc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlPoint;
    use approx::assert_relative_eq;

    fn plane(lon: f64, lat: f64) -> f64 {
        2.0 + 0.5 * (lon - 120.0) - 0.25 * (lat - 24.0)
    }

    fn planar_grid() -> ControlPointSet {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..4 {
                let lon = 120.0 + i as f64 * 0.5;
                let lat = 23.0 + j as f64 * 0.5;
                points.push(ControlPoint::new(lon, lat, plane(lon, lat)));
            }
        }
        points.into()
    }

    #[test]
    fn test_reproduces_planar_surface() {
        let interp = TriangulatedInterpolant::new(&planar_grid());
        assert!(interp.triangle_count() > 0);

        for &(lon, lat) in &[(120.3, 23.2), (121.1, 24.4), (121.99, 24.49), (120.0, 23.0)] {
            let h = interp.interpolate(GeoPoint::new(lon, lat));
            assert_relative_eq!(h, plane(lon, lat), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_exact_at_control_points() {
        let set = planar_grid();
        let interp = TriangulatedInterpolant::new(&set);
        for p in set.points() {
            assert_relative_eq!(interp.interpolate(p.position()), p.height, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outside_hull_is_nan() {
        let interp = TriangulatedInterpolant::new(&planar_grid());
        assert!(interp.interpolate(GeoPoint::new(119.0, 24.0)).is_nan());
        assert!(interp.interpolate(GeoPoint::new(121.0, 26.0)).is_nan());
        assert!(interp.interpolate(GeoPoint::new(f64::NAN, 24.0)).is_nan());
    }

    #[test]
    fn test_three_point_triangle() {
        let set: ControlPointSet = vec![
            ControlPoint::new(120.0, 24.0, 1.0),
            ControlPoint::new(121.0, 24.0, 1.2),
            ControlPoint::new(121.0, 25.0, 0.9),
        ]
        .into();
        let interp = TriangulatedInterpolant::new(&set);
        assert_eq!(interp.triangle_count(), 1);

        // Barycentric weights at (120.5, 24.2) are (0.5, 0.3, 0.2).
        let h = interp.interpolate(GeoPoint::new(120.5, 24.2));
        assert_relative_eq!(h, 0.5 * 1.0 + 0.3 * 1.2 + 0.2 * 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let single: ControlPointSet = vec![ControlPoint::new(120.0, 24.0, 1.0)].into();
        assert!(TriangulatedInterpolant::new(&single).is_degenerate());

        let collinear: ControlPointSet = vec![
            ControlPoint::new(120.0, 24.0, 1.0),
            ControlPoint::new(121.0, 24.0, 2.0),
            ControlPoint::new(122.0, 24.0, 3.0),
        ]
        .into();
        let interp = TriangulatedInterpolant::new(&collinear);
        assert!(interp.is_degenerate());
        assert!(interp.interpolate(GeoPoint::new(121.0, 24.0)).is_nan());
    }
}
