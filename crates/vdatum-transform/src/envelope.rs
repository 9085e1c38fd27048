//! The operating envelope and the range filter built on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use vdatum_surface::GeoPoint;

/// Rectangular longitude/latitude region in which surface data is valid.
///
/// Bounds are closed: points on the edge are inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Western edge (degrees east).
    pub lon_min: f64,
    /// Eastern edge (degrees east).
    pub lon_max: f64,
    /// Southern edge (degrees north).
    pub lat_min: f64,
    /// Northern edge (degrees north).
    pub lat_max: f64,
}

impl Default for Envelope {
    /// The reference deployment: 118 to 125°E, 21 to 27°N.
    fn default() -> Self {
        Self::new(118.0, 125.0, 21.0, 27.0)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}~{:?}E, {:?}~{:?}N",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}

/// Indices of points split by whether they lie inside the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Positions of points inside the envelope, ascending.
    pub inside: Vec<usize>,
    /// Positions of points outside the envelope, ascending.
    pub outside: Vec<usize>,
}

impl Envelope {
    /// Create an envelope from its edges.
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Whether a coordinate lies inside the envelope (edges included).
    ///
    /// `NaN` coordinates are outside.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }

    /// Whether a point lies inside the envelope.
    pub fn contains_point(&self, point: GeoPoint) -> bool {
        self.contains(point.lon, point.lat)
    }

    /// Split points into those inside and outside the envelope.
    pub fn partition(&self, points: &[GeoPoint]) -> Partition {
        let mut partition = Partition::default();
        for (i, &p) in points.iter().enumerate() {
            if self.contains_point(p) {
                partition.inside.push(i);
            } else {
                partition.outside.push(i);
            }
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_envelope() {
        let env = Envelope::default();
        assert_eq!(env, Envelope::new(118.0, 125.0, 21.0, 27.0));
        assert_eq!(env.to_string(), "118.0~125.0E, 21.0~27.0N");
    }

    #[test]
    fn test_contains_edges() {
        let env = Envelope::default();
        assert!(env.contains(121.5, 24.0));
        assert!(env.contains(118.0, 21.0)); // Corner
        assert!(env.contains(125.0, 27.0)); // Corner
        assert!(env.contains(125.0, 24.0)); // East edge
        assert!(!env.contains(117.9999, 24.0)); // Too far west
        assert!(!env.contains(125.0001, 24.0)); // Too far east
        assert!(!env.contains(121.0, 20.5)); // Too far south
        assert!(!env.contains(121.0, 27.5)); // Too far north
        assert!(!env.contains(f64::NAN, 24.0));
    }

    #[test]
    fn test_partition() {
        let env = Envelope::default();
        let points = [
            GeoPoint::new(121.0, 24.0),
            GeoPoint::new(130.0, 24.0),
            GeoPoint::new(118.0, 27.0),
            GeoPoint::new(121.0, 10.0),
            GeoPoint::new(124.5, 21.5),
        ];
        let partition = env.partition(&points);

        assert_eq!(partition.inside, vec![0, 2, 4]);
        assert_eq!(partition.outside, vec![1, 3]);
    }

    #[test]
    fn test_partition_empty() {
        assert_eq!(Envelope::default().partition(&[]), Partition::default());
    }
}
