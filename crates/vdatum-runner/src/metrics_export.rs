//! In-memory metrics recorder and JSON export.
//!
//! Install an [`InMemoryRecorder`] as the global recorder (or scope it with
//! `metrics::with_local_recorder`), run transforms, then take a
//! [`MetricsSnapshot`]. Counters are broken down by each label key:
//!
//! ```json
//! {
//!   "metrics": {
//!     "vdatum.surface.fallback_points": {
//!       "total": 2,
//!       "labels": { "surface": { "HAT": 1, "MSS": 1 } }
//!     }
//!   }
//! }
//! ```

use crate::Result;
use metrics::{
    Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
    SharedString, Unit,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct CounterCell(AtomicU64);

impl CounterFn for CounterCell {
    fn increment(&self, value: u64) {
        self.0.fetch_add(value, Ordering::Relaxed);
    }

    fn absolute(&self, value: u64) {
        self.0.fetch_max(value, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
struct HistogramCell(Mutex<Vec<f64>>);

impl HistogramFn for HistogramCell {
    fn record(&self, value: f64) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }
}

/// Recorder that keeps every counter and histogram in memory.
///
/// Gauges are not used by this workspace and are discarded.
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    counters: Mutex<HashMap<Key, Arc<CounterCell>>>,
    histograms: Mutex<HashMap<Key, Arc<HistogramCell>>>,
}

impl InMemoryRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate everything recorded so far.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut metrics = BTreeMap::new();

        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, cell) in counters.iter() {
            let value = cell.0.load(Ordering::Relaxed);
            let entry = metrics
                .entry(key.name().to_string())
                .or_insert_with(|| MetricValue::Counter(CounterValue::default()));
            if let MetricValue::Counter(counter) = entry {
                counter.total += value;
                for label in key.labels() {
                    *counter
                        .labels
                        .entry(label.key().to_string())
                        .or_default()
                        .entry(label.value().to_string())
                        .or_default() += value;
                }
            }
        }
        drop(counters);

        let histograms = self.histograms.lock().unwrap_or_else(PoisonError::into_inner);
        let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (key, cell) in histograms.iter() {
            let values = cell.0.lock().unwrap_or_else(PoisonError::into_inner);
            samples
                .entry(key.name().to_string())
                .or_default()
                .extend(values.iter().copied());
        }
        for (name, values) in samples {
            metrics.insert(name, MetricValue::Histogram(HistogramValue::from_samples(&values)));
        }

        MetricsSnapshot { metrics }
    }
}

impl Recorder for InMemoryRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let cell = counters.entry(key.clone()).or_default();
        Counter::from_arc(Arc::clone(cell))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        let mut histograms = self.histograms.lock().unwrap_or_else(PoisonError::into_inner);
        let cell = histograms.entry(key.clone()).or_default();
        Histogram::from_arc(Arc::clone(cell))
    }
}

/// Recorded metrics keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub metrics: BTreeMap<String, MetricValue>,
}

/// Value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Counter(CounterValue),
    Histogram(HistogramValue),
}

/// Counter total with per-label breakdowns (`label key -> label value -> total`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterValue {
    pub total: u64,
    #[serde(default)]
    pub labels: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Summary of a histogram's samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramValue {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl HistogramValue {
    fn from_samples(values: &[f64]) -> Self {
        let sum: f64 = values.iter().sum();
        let count = values.len();
        Self {
            count: count as u64,
            sum,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: if count == 0 { 0.0 } else { sum / count as f64 },
        }
    }
}

impl MetricsSnapshot {
    /// A counter by name.
    pub fn counter(&self, name: &str) -> Option<&CounterValue> {
        match self.metrics.get(name)? {
            MetricValue::Counter(c) => Some(c),
            MetricValue::Histogram(_) => None,
        }
    }

    /// A counter's total for one label value.
    pub fn counter_for_label(&self, name: &str, label: &str, value: &str) -> Option<u64> {
        self.counter(name)?.labels.get(label)?.get(value).copied()
    }

    /// A histogram by name.
    pub fn histogram(&self, name: &str) -> Option<&HistogramValue> {
        match self.metrics.get(name)? {
            MetricValue::Histogram(h) => Some(h),
            MetricValue::Counter(_) => None,
        }
    }

    /// Write the snapshot as pretty JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
