//! Error types for the surface crate.

use crate::Surface;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or interpolating a reference surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// I/O error reading a control-point file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file backing a surface could not be found.
    #[error("Missing surface file for {surface}: {}", path.display())]
    MissingData {
        /// Surface whose data was requested.
        surface: Surface,
        /// Path that was expected to hold the control points.
        path: PathBuf,
    },

    /// A surface has no usable control points and cannot be interpolated.
    #[error("Surface {0} has no control points")]
    InsufficientData(Surface),

    /// A surface name, code or index could not be recognised.
    #[error("Unknown surface: {0}")]
    UnknownSurface(String),

    /// Cache lock was poisoned (a thread panicked while holding the lock).
    #[error("Surface cache lock was poisoned")]
    CacheLockPoisoned,
}
