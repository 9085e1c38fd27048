//! Metrics for the vertical datum transformation crates.
//!
//! Re-exports the `metrics` facade and declares every metric the workspace
//! records as a [`Metric`] constant, so names and units live in one place.
//! Without an installed recorder all recording calls are no-ops.
//!
//! # Example
//!
//! ```rust,ignore
//! use vdatum_metrics::{describe_metrics, metric_defs, TransformLabels};
//!
//! describe_metrics();
//!
//! let labels = TransformLabels::new("MSS", "HAT", "DEPTH");
//! metrics::counter!(metric_defs::TRANSFORM_POINTS.name, &labels.to_labels()).increment(10);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_histogram, Unit};

/// The kind of metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use vdatum_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const LOADED: Metric = Metric::counter("vdatum.surface.loaded")
///     .with_description("Surfaces loaded")
///     .with_unit(Unit::Count)
///     .with_labels(&["surface"]);
///
/// assert_eq!(LOADED.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "vdatum.transform.points").
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// The unit of measurement, if any.
    pub unit: Option<Unit>,
    /// Expected label keys.
    pub labels: &'static [&'static str],
}

impl Metric {
    const fn with_kind(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Counter)
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Histogram)
    }

    /// Sets the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Labels attached to transform metrics.
    pub const TRANSFORM_LABELS: &[&str] = &["input_surface", "output_surface", "value_kind"];

    /// Points run through the datum transform.
    pub const TRANSFORM_POINTS: Metric = Metric::counter("vdatum.transform.points")
        .with_description("Points run through the datum transform")
        .with_unit(Unit::Count)
        .with_labels(TRANSFORM_LABELS);

    /// Points left untransformed because they lie outside the envelope.
    pub const OUTSIDE_ENVELOPE_POINTS: Metric = Metric::counter("vdatum.transform.outside_envelope")
        .with_description("Points outside the operating envelope")
        .with_unit(Unit::Count)
        .with_labels(TRANSFORM_LABELS);

    /// Bulk file transforms that reported failure.
    pub const BULK_FAILURES: Metric = Metric::counter("vdatum.bulk.failures")
        .with_description("Bulk file transforms that failed")
        .with_unit(Unit::Count)
        .with_labels(TRANSFORM_LABELS);

    /// Wall time of a bulk file transform.
    pub const BULK_DURATION: Metric = Metric::histogram("vdatum.bulk.duration_ms")
        .with_description("Wall time of a bulk file transform")
        .with_unit(Unit::Milliseconds)
        .with_labels(TRANSFORM_LABELS);

    /// Query points that needed the nearest-control-point fallback.
    pub const FALLBACK_POINTS: Metric = Metric::counter("vdatum.surface.fallback_points")
        .with_description("Query points outside the triangulated hull")
        .with_unit(Unit::Count)
        .with_labels(&["surface"]);

    /// Time to triangulate a surface's control points.
    pub const INTERPOLANT_BUILD_TIME: Metric = Metric::histogram("vdatum.surface.build_time_ms")
        .with_description("Time to build a surface interpolant")
        .with_unit(Unit::Milliseconds)
        .with_labels(&["surface"]);

    /// Every metric, for bulk description at startup.
    pub const ALL: &[&Metric] = &[
        &TRANSFORM_POINTS,
        &OUTSIDE_ENVELOPE_POINTS,
        &BULK_FAILURES,
        &BULK_DURATION,
        &FALLBACK_POINTS,
        &INTERPOLANT_BUILD_TIME,
    ];
}

/// Labels identifying one transform configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformLabels {
    /// Code of the surface the values are expressed against.
    pub input_surface: String,
    /// Code of the surface the values are converted to.
    pub output_surface: String,
    /// Value kind tag.
    pub value_kind: String,
}

impl TransformLabels {
    /// Create labels for a transform.
    pub fn new(
        input_surface: impl Into<String>,
        output_surface: impl Into<String>,
        value_kind: impl Into<String>,
    ) -> Self {
        Self {
            input_surface: input_surface.into(),
            output_surface: output_surface.into(),
            value_kind: value_kind.into(),
        }
    }

    /// Converts the labels to the `metrics` crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input_surface", self.input_surface.clone()),
            ("output_surface", self.output_surface.clone()),
            ("value_kind", self.value_kind.clone()),
        ]
    }
}

/// Describes all metrics. Call once at startup, after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
