//! Error types for the transform crate.

use std::path::PathBuf;
use thiserror::Error;
use vdatum_surface::SurfaceError;

/// Errors that can occur while transforming measurements between surfaces.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A surface could not be loaded or interpolated.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Unrecognised value-kind tag.
    #[error("Unknown input value type: {0}")]
    InvalidValueKind(String),

    /// Points and values differ in length.
    #[error("Got {points} points but {values} values")]
    LengthMismatch {
        /// Number of query points.
        points: usize,
        /// Number of measurement values.
        values: usize,
    },

    /// A bulk input file had no usable rows.
    #[error("Input file is empty or invalid: {}", .0.display())]
    EmptyInput(PathBuf),

    /// I/O error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
