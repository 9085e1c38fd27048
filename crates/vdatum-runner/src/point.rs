//! Single-point transforms.

use crate::{Result, RunnerError};
use serde::Serialize;
use vdatum_surface::{GeoPoint, Surface, SurfaceManager};
use vdatum_transform::{transform, TransformOptions, ValueKind};

/// A transformed point with the surface heights behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointResult {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Surface the value is measured against.
    pub input_surface: Surface,
    /// Surface the value is converted to.
    pub output_surface: Surface,
    /// Sign convention of `value` and `transformed`.
    pub value_kind: ValueKind,
    /// Value as given.
    pub value: f64,
    /// Value against the output surface.
    pub transformed: f64,
    /// Ellipsoidal height of the input surface at the point, in meters.
    pub input_height: f64,
    /// Ellipsoidal height of the output surface at the point, in meters.
    pub output_height: f64,
}

/// Transform one measurement.
///
/// Unlike the bulk path, a point outside the envelope is an error.
pub fn transform_point(
    manager: &SurfaceManager,
    options: &TransformOptions,
    point: GeoPoint,
    value: f64,
) -> Result<PointResult> {
    if !options.envelope.contains_point(point) {
        return Err(RunnerError::OutsideEnvelope(options.envelope));
    }

    let output = transform(
        manager,
        options.input_surface,
        options.output_surface,
        &[point],
        &[value],
        options.value_kind,
    )?;

    Ok(PointResult {
        lon: point.lon,
        lat: point.lat,
        input_surface: options.input_surface,
        output_surface: options.output_surface,
        value_kind: options.value_kind,
        value,
        transformed: output.values[0],
        input_height: output.input_heights[0],
        output_height: output.output_heights[0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vdatum_surface::{ControlPoint, SurfaceCatalog};
    use vdatum_transform::Envelope;

    fn manager() -> SurfaceManager {
        let manager = SurfaceManager::new(SurfaceCatalog::new("/nonexistent/dir"));
        manager
            .insert_control_points(Surface::Mss, vec![ControlPoint::new(121.0, 24.0, 1.0)].into())
            .unwrap();
        manager
            .insert_control_points(Surface::Lat, vec![ControlPoint::new(121.0, 24.0, -0.8)].into())
            .unwrap();
        manager
    }

    #[test]
    fn test_point_inside() {
        let options = TransformOptions::new(Surface::Mss, Surface::Lat);
        let result = transform_point(&manager(), &options, GeoPoint::new(121.5, 24.0), 10.0).unwrap();

        assert_eq!(result.input_height, 1.0);
        assert_eq!(result.output_height, -0.8);
        assert_relative_eq!(result.transformed, 8.2, epsilon = 1e-12);
    }

    #[test]
    fn test_point_on_edge_is_inside() {
        let options = TransformOptions::new(Surface::Mss, Surface::Lat);
        assert!(transform_point(&manager(), &options, GeoPoint::new(125.0, 27.0), 1.0).is_ok());
    }

    #[test]
    fn test_point_outside() {
        let options = TransformOptions::new(Surface::Mss, Surface::Lat);
        let err = transform_point(&manager(), &options, GeoPoint::new(117.5, 24.0), 10.0)
            .unwrap_err();

        assert!(matches!(err, RunnerError::OutsideEnvelope(_)));
        assert_eq!(
            err.to_string(),
            "The point must be inside the range:\n 118.0~125.0E, 21.0~27.0N."
        );
    }

    #[test]
    fn test_custom_envelope() {
        let options = TransformOptions::new(Surface::Mss, Surface::Lat)
            .with_envelope(Envelope::new(100.0, 130.0, 0.0, 40.0));
        assert!(transform_point(&manager(), &options, GeoPoint::new(117.5, 24.0), 10.0).is_ok());
    }

    #[test]
    fn test_json_shape() {
        let options = TransformOptions::new(Surface::Mss, Surface::Ellipsoid);
        let result = transform_point(&manager(), &options, GeoPoint::new(121.0, 24.0), 3.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["input_surface"], "MSS");
        assert_eq!(json["output_surface"], "EL");
        assert_eq!(json["value_kind"], "DEPTH");
        assert_eq!(json["transformed"], 2.0);
    }
}
