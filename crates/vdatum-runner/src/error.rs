//! Error types for the runner.

use std::path::PathBuf;
use thiserror::Error;
use vdatum_surface::SurfaceError;
use vdatum_transform::{Envelope, TransformError};

/// Errors surfaced by the command-line runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`VdatumConfig`](crate::VdatumConfig).
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A single point lies outside the operating envelope.
    #[error("The point must be inside the range:\n {0}.")]
    OutsideEnvelope(Envelope),

    /// Surface lookup failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Transform failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// JSON serialization of a result failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background worker stopped without reporting an outcome.
    #[error("Bulk worker exited without reporting a result")]
    WorkerDisconnected,

    /// I/O error (thread spawn, output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
