//! Per-surface height field: linear interpolation with a nearest-point fallback.

use crate::{ControlPointSet, GeoPoint, NearestInterpolant, TriangulatedInterpolant};
use std::sync::{Arc, OnceLock};

/// Heights evaluated for a batch of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightSample {
    /// One height per query point, in query order.
    pub heights: Vec<f64>,
    /// How many of the heights came from the nearest-point fallback.
    pub fallback_count: usize,
}

/// The continuous height field of one data-backed surface.
///
/// The triangulation is built eagerly; the nearest-neighbour index is built
/// the first time a query falls outside the hull.
#[derive(Debug)]
pub struct SurfaceInterpolant {
    points: Arc<ControlPointSet>,
    linear: TriangulatedInterpolant,
    nearest: OnceLock<NearestInterpolant>,
}

impl SurfaceInterpolant {
    /// Build the interpolant for a control-point set.
    pub fn new(points: Arc<ControlPointSet>) -> Self {
        let linear = TriangulatedInterpolant::new(&points);
        Self {
            points,
            linear,
            nearest: OnceLock::new(),
        }
    }

    /// The control points this field was built from.
    pub fn control_points(&self) -> &ControlPointSet {
        &self.points
    }

    /// The primary linear interpolant.
    pub fn linear(&self) -> &TriangulatedInterpolant {
        &self.linear
    }

    fn nearest(&self) -> &NearestInterpolant {
        self.nearest
            .get_or_init(|| NearestInterpolant::new(&self.points))
    }

    /// Height at a single point.
    pub fn height(&self, point: GeoPoint) -> f64 {
        let h = self.linear.interpolate(point);
        if h.is_nan() {
            self.nearest().interpolate(point)
        } else {
            h
        }
    }

    /// Heights at many points, counting how many needed the fallback.
    pub fn heights(&self, points: &[GeoPoint]) -> HeightSample {
        let mut heights: Vec<f64> = points
            .iter()
            .map(|&p| self.linear.interpolate(p))
            .collect();

        let mut fallback_count = 0;
        for (h, &p) in heights.iter_mut().zip(points) {
            if h.is_nan() {
                *h = self.nearest().interpolate(p);
                fallback_count += 1;
            }
        }

        HeightSample {
            heights,
            fallback_count,
        }
    }
}
