//! # vdatum-runner
//!
//! Command-line glue around the transform core: YAML configuration, logging
//! setup, an in-memory metrics recorder, single-point transforms and
//! background bulk jobs. The `vdatum` binary is a thin layer over this library.

pub mod config;
mod error;
pub mod job;
pub mod logging;
pub mod metrics_export;
pub mod point;

pub use config::VdatumConfig;
pub use error::RunnerError;
pub use job::{spawn_bulk_job, BulkJobHandle};
pub use logging::init_logging;
pub use metrics_export::{InMemoryRecorder, MetricsSnapshot};
pub use point::{transform_point, PointResult};

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
