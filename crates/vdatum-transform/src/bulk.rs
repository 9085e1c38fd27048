//! Bulk transform of `lon lat value` files.
//!
//! Every failure is reported through [`BulkOutcome`] rather than returned as an
//! error, so a caller on another thread only ever has one value to forward.

use crate::{transform, Result, TransformError, TransformOptions};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use vdatum_metrics::{metric_defs, metrics, TransformLabels};
use vdatum_surface::points::read_xyz_file;
use vdatum_surface::{GeoPoint, SurfaceManager, XyzRow};

/// Where to read input and where to write the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequest {
    /// Three-column input file.
    pub input: PathBuf,
    /// Directory for the output file; created if missing.
    pub output_dir: PathBuf,
    /// Output file name inside `output_dir`.
    pub output_name: String,
}

impl BulkRequest {
    /// Create a request.
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            output_name: output_name.into(),
        }
    }

    /// Full path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

/// Result of a bulk transform.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    /// Whether the output file was written.
    pub success: bool,
    /// One-line summary for the user.
    pub message: String,
    /// Rows parsed from the input.
    pub total_points: usize,
    /// Rows outside the envelope, written with `NaN` in the transformed column.
    pub outside_points: usize,
    /// Path of the output file, when written.
    pub output_path: Option<PathBuf>,
}

impl BulkOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            total_points: 0,
            outside_points: 0,
            output_path: None,
        }
    }
}

/// Render one value: `%8.3f` when finite, otherwise `NaN` right-aligned in 8.
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:8.3}")
    } else {
        format!("{:>8}", "NaN")
    }
}

/// Render one output row: `lon lat original transformed`.
pub fn format_row(lon: f64, lat: f64, original: f64, transformed: f64) -> String {
    format!(
        "{lon:11.7} {lat:10.7} {} {}",
        format_value(original),
        format_value(transformed)
    )
}

/// Summary message for a successful run.
pub fn success_message(outside_points: usize) -> String {
    match outside_points {
        0 => "OK!".to_string(),
        1 => "OK!  (There is 1 point outside the range)".to_string(),
        n => format!("OK!  (There are {n} points outside the range)"),
    }
}

/// Transform a file with the given options.
///
/// Rows outside `options.envelope` are kept in place with a `NaN` transformed
/// value. The output has exactly one row per parsed input row, in input order.
pub fn transform_file(
    manager: &SurfaceManager,
    options: &TransformOptions,
    request: &BulkRequest,
) -> BulkOutcome {
    let labels = TransformLabels::new(
        options.input_surface.code(),
        options.output_surface.code(),
        options.value_kind.tag(),
    )
    .to_labels();
    let start = Instant::now();

    let outcome = match run(manager, options, request) {
        Ok(outcome) => outcome,
        Err(TransformError::EmptyInput(path)) => {
            warn!(input = %path.display(), "Bulk input has no usable rows");
            BulkOutcome::failure("Input file is empty or invalid.")
        }
        Err(e) => {
            warn!(input = %request.input.display(), error = %e, "Bulk transform failed");
            BulkOutcome::failure(format!("Error: {e}"))
        }
    };

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    metrics::histogram!(metric_defs::BULK_DURATION.name, &labels).record(elapsed_ms);
    if outcome.success {
        metrics::counter!(metric_defs::OUTSIDE_ENVELOPE_POINTS.name, &labels)
            .increment(outcome.outside_points as u64);
        info!(
            input = %request.input.display(),
            output = %request.output_path().display(),
            from = %options.input_surface,
            to = %options.output_surface,
            kind = %options.value_kind,
            points = outcome.total_points,
            outside = outcome.outside_points,
            elapsed_ms,
            "Bulk transform complete"
        );
    } else {
        metrics::counter!(metric_defs::BULK_FAILURES.name, &labels).increment(1);
    }

    outcome
}

fn run(
    manager: &SurfaceManager,
    options: &TransformOptions,
    request: &BulkRequest,
) -> Result<BulkOutcome> {
    let parsed = read_xyz_file(&request.input)?;
    if parsed.skipped > 0 {
        warn!(
            input = %request.input.display(),
            skipped = parsed.skipped,
            "Skipped malformed input rows"
        );
    }
    let rows = parsed.rows;
    if rows.is_empty() {
        return Err(TransformError::EmptyInput(request.input.clone()));
    }

    let points: Vec<GeoPoint> = rows.iter().map(XyzRow::point).collect();
    let partition = options.envelope.partition(&points);

    let mut transformed = vec![f64::NAN; rows.len()];
    if !partition.inside.is_empty() {
        let inside_points: Vec<GeoPoint> = partition.inside.iter().map(|&i| points[i]).collect();
        let inside_values: Vec<f64> = partition.inside.iter().map(|&i| rows[i].value).collect();
        let output = transform(
            manager,
            options.input_surface,
            options.output_surface,
            &inside_points,
            &inside_values,
            options.value_kind,
        )?;
        for (&i, value) in partition.inside.iter().zip(output.values) {
            transformed[i] = value;
        }
    }

    fs::create_dir_all(&request.output_dir)?;
    let output_path = request.output_path();
    write_rows(&output_path, &rows, &transformed)?;

    let outside_points = partition.outside.len();
    Ok(BulkOutcome {
        success: true,
        message: success_message(outside_points),
        total_points: rows.len(),
        outside_points,
        output_path: Some(output_path),
    })
}

fn write_rows(path: &Path, rows: &[XyzRow], transformed: &[f64]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (row, &value) in rows.iter().zip(transformed) {
        writeln!(writer, "{}", format_row(row.lon, row.lat, row.value, value))?;
    }
    writer.flush()?;
    Ok(())
}
