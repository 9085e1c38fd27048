//! Nearest-control-point lookup used as the fallback outside the hull.

use crate::{ControlPointSet, GeoPoint};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

#[derive(Debug, Clone)]
struct IndexedPoint {
    position: [f64; 2],
    /// Position of the point in its control-point set.
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-neighbour interpolant over a control-point set.
///
/// Distance is planar in degrees. When several control points are equally
/// close the one that comes first in the set wins, so results do not depend
/// on tree layout.
pub struct NearestInterpolant {
    heights: Vec<f64>,
    tree: RTree<IndexedPoint>,
}

impl std::fmt::Debug for NearestInterpolant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearestInterpolant")
            .field("points", &self.tree.size())
            .finish()
    }
}

impl NearestInterpolant {
    /// Index the control points. Points with non-finite coordinates are skipped.
    pub fn new(points: &ControlPointSet) -> Self {
        let entries: Vec<IndexedPoint> = points
            .points()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position().is_finite())
            .map(|(index, p)| IndexedPoint {
                position: [p.lon, p.lat],
                index,
            })
            .collect();

        Self {
            heights: points.points().iter().map(|p| p.height).collect(),
            tree: RTree::bulk_load(entries),
        }
    }

    /// Whether there is no point to fall back to.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Index of the closest control point, lowest index on ties.
    pub fn nearest_index(&self, point: GeoPoint) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }

        let mut candidates = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[point.lon, point.lat]);
        let (first, best_distance) = candidates.next()?;
        let mut best = first.index;
        for (entry, distance) in candidates {
            if distance > best_distance {
                break;
            }
            best = best.min(entry.index);
        }
        Some(best)
    }

    /// Height of the closest control point, or `NaN` if there is none.
    pub fn interpolate(&self, point: GeoPoint) -> f64 {
        self.nearest_index(point)
            .map(|index| self.heights[index])
            .unwrap_or(f64::NAN)
    }
}
