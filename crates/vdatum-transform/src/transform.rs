//! The datum transform engine.
//!
//! All surface heights are ellipsoidal (up positive), so two independently
//! interpolated surfaces can be combined point by point:
//!
//! - depth: `d_out = d_in + (H_out - H_in)`
//! - ellipsoidal bed height `h`: `d_out = H_out - h`

use crate::{Result, TransformError, ValueKind};
use tracing::debug;
use vdatum_metrics::{metric_defs, metrics, TransformLabels};
use vdatum_surface::{GeoPoint, Surface, SurfaceManager};

/// Transformed values together with the surface heights used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    /// Measurement re-expressed against the output surface.
    pub values: Vec<f64>,
    /// Ellipsoidal height of the input surface at each point.
    pub input_heights: Vec<f64>,
    /// Ellipsoidal height of the output surface at each point.
    pub output_heights: Vec<f64>,
}

/// Apply the sign convention of `kind` to one point.
///
/// `NaN` in any operand propagates to the result.
pub fn transform_value(kind: ValueKind, value: f64, input_height: f64, output_height: f64) -> f64 {
    match kind {
        ValueKind::Depth => value + (output_height - input_height),
        ValueKind::EllipsoidalBedHeight => output_height - value,
    }
}

/// Re-express measurements taken against `input` as measurements against `output`.
///
/// Points are not range checked here; callers filter with
/// [`Envelope::partition`](crate::Envelope::partition) first.
///
/// # Errors
///
/// [`TransformError::LengthMismatch`] if `points` and `values` differ in
/// length, or a surface error if either surface cannot be interpolated.
pub fn transform(
    manager: &SurfaceManager,
    input: Surface,
    output: Surface,
    points: &[GeoPoint],
    values: &[f64],
    kind: ValueKind,
) -> Result<TransformOutput> {
    if points.len() != values.len() {
        return Err(TransformError::LengthMismatch {
            points: points.len(),
            values: values.len(),
        });
    }

    let input_heights = manager.height_at(input, points)?;
    let output_heights = manager.height_at(output, points)?;

    let new_values: Vec<f64> = values
        .iter()
        .zip(input_heights.iter().zip(&output_heights))
        .map(|(&v, (&h_in, &h_out))| transform_value(kind, v, h_in, h_out))
        .collect();

    debug!(
        input = %input,
        output = %output,
        kind = %kind,
        points = points.len(),
        "Transformed values"
    );
    let labels = TransformLabels::new(input.code(), output.code(), kind.tag()).to_labels();
    metrics::counter!(metric_defs::TRANSFORM_POINTS.name, &labels).increment(points.len() as u64);

    Ok(TransformOutput {
        values: new_values,
        input_heights,
        output_heights,
    })
}
