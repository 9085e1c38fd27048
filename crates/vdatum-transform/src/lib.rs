//! # vdatum-transform
//!
//! Re-references vertical measurements from one surface to another.
//!
//! Depths are measured down from an input surface; ellipsoidal bed heights are
//! measured up from the ellipsoid. Both are converted to a depth below the
//! output surface using the ellipsoidal heights of the two surfaces at each
//! point, supplied by a [`SurfaceManager`](vdatum_surface::SurfaceManager).
//!
//! Points outside the operating [`Envelope`] are never transformed. Single
//! point callers reject them; [`transform_file`] keeps them in the output with
//! a `NaN` transformed value.
//!
//! ## Example
//!
//! ```no_run
//! use vdatum_surface::{GeoPoint, Surface, SurfaceCatalog, SurfaceManager};
//! use vdatum_transform::{transform, ValueKind};
//!
//! let manager = SurfaceManager::new(SurfaceCatalog::new("file"));
//! let out = transform(
//!     &manager,
//!     Surface::Mss,
//!     Surface::Lat,
//!     &[GeoPoint::new(121.5, 24.0)],
//!     &[35.2],
//!     ValueKind::Depth,
//! )?;
//! println!("Depth below LAT: {:.4} m", out.values[0]);
//! # Ok::<(), vdatum_transform::TransformError>(())
//! ```

mod bulk;
mod envelope;
mod error;
mod kind;
mod options;
mod transform;

pub use bulk::{
    format_row, format_value, success_message, transform_file, BulkOutcome, BulkRequest,
};
pub use envelope::{Envelope, Partition};
pub use error::TransformError;
pub use kind::ValueKind;
pub use options::TransformOptions;
pub use transform::{transform, transform_value, TransformOutput};

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
