//! # vdatum-surface
//!
//! Vertical reference surfaces and their continuous height fields.
//!
//! Each surface (mean sea surface, tidal datums, geoid) is defined by a file of
//! scattered control points `lon lat height`, where height is the ellipsoidal
//! height of the surface in meters, up positive. The ellipsoid itself is the
//! zero surface and has no file.
//!
//! ## Overview
//!
//! - [`PointCloudLoader`] reads a surface's control points once and caches them.
//! - [`TriangulatedInterpolant`] interpolates linearly over a Delaunay
//!   triangulation of the control points; queries outside the convex hull give
//!   `NaN`.
//! - [`NearestInterpolant`] returns the height of the closest control point and
//!   fills in wherever the linear interpolant is undefined.
//! - [`SurfaceManager`] ties these together and caches one
//!   [`SurfaceInterpolant`] per surface.
//!
//! ## Example
//!
//! ```no_run
//! use vdatum_surface::{GeoPoint, Surface, SurfaceCatalog, SurfaceManager};
//!
//! let manager = SurfaceManager::new(SurfaceCatalog::new("file"));
//! let points = [GeoPoint::new(121.5, 24.0), GeoPoint::new(120.2, 22.6)];
//!
//! let geoid = manager.height_at(Surface::Geoid, &points)?;
//! let ellipsoid = manager.height_at(Surface::Ellipsoid, &points)?;
//! assert_eq!(ellipsoid, vec![0.0, 0.0]);
//! # let _ = geoid;
//! # Ok::<(), vdatum_surface::SurfaceError>(())
//! ```

mod error;
mod interpolant;
mod loader;
mod manager;
mod nearest;
pub mod points;
mod surface;
mod triangulation;

pub use error::SurfaceError;
pub use interpolant::{HeightSample, SurfaceInterpolant};
pub use loader::PointCloudLoader;
pub use manager::SurfaceManager;
pub use nearest::NearestInterpolant;
pub use points::{ControlPoint, ControlPointSet, GeoPoint, XyzRow, XyzRows};
pub use surface::{Surface, SurfaceCatalog, DEFAULT_DATA_DIR};
pub use triangulation::TriangulatedInterpolant;

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
