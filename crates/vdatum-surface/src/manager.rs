//! Surface manager: lazily built, cached height fields for every surface.

use crate::{
    ControlPointSet, GeoPoint, PointCloudLoader, Result, Surface, SurfaceCatalog, SurfaceError,
    SurfaceInterpolant,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, warn};
use vdatum_metrics::{metric_defs, metrics};

/// Registry of surface height fields.
///
/// Control points are loaded and triangulated the first time a surface is
/// queried and kept for the lifetime of the manager. This type is thread-safe
/// and can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```no_run
/// use vdatum_surface::{GeoPoint, Surface, SurfaceCatalog, SurfaceManager};
///
/// let manager = SurfaceManager::new(SurfaceCatalog::new("file"));
/// let heights = manager.height_at(Surface::Mss, &[GeoPoint::new(121.5, 24.0)])?;
/// println!("MSS ellipsoidal height: {:.3} m", heights[0]);
/// # Ok::<(), vdatum_surface::SurfaceError>(())
/// ```
#[derive(Debug)]
pub struct SurfaceManager {
    loader: PointCloudLoader,
    interpolants: RwLock<HashMap<Surface, Arc<SurfaceInterpolant>>>,
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new(SurfaceCatalog::default())
    }
}

impl SurfaceManager {
    /// Create a manager that reads surface files through the given catalog.
    pub fn new(catalog: SurfaceCatalog) -> Self {
        Self::with_loader(PointCloudLoader::new(catalog))
    }

    /// Create a manager around an existing loader.
    pub fn with_loader(loader: PointCloudLoader) -> Self {
        Self {
            loader,
            interpolants: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying control-point loader.
    pub fn loader(&self) -> &PointCloudLoader {
        &self.loader
    }

    /// Register in-memory control points for a surface.
    ///
    /// Any interpolant already built for the surface is discarded. Once this
    /// returns, no interpolant built from the replaced points can be published.
    pub fn insert_control_points(&self, surface: Surface, points: ControlPointSet) -> Result<()> {
        // Lock order: interpolants, then loader.
        let mut interpolants = self
            .interpolants
            .write()
            .map_err(|_| SurfaceError::CacheLockPoisoned)?;
        self.loader.insert(surface, points)?;
        interpolants.remove(&surface);
        Ok(())
    }

    /// Get (building if necessary) the height field of a data-backed surface.
    ///
    /// Fails with [`SurfaceError::InsufficientData`] for the ellipsoid and for
    /// surfaces without a control point at a finite position.
    pub fn interpolant(&self, surface: Surface) -> Result<Arc<SurfaceInterpolant>> {
        loop {
            {
                let interpolants = self
                    .interpolants
                    .read()
                    .map_err(|_| SurfaceError::CacheLockPoisoned)?;
                if let Some(interp) = interpolants.get(&surface) {
                    return Ok(Arc::clone(interp));
                }
            }

            let points = self.loader.load(surface)?;
            if !points.has_usable_points() {
                return Err(SurfaceError::InsufficientData(surface));
            }
            let built = Self::build(surface, Arc::clone(&points));

            let mut interpolants = self
                .interpolants
                .write()
                .map_err(|_| SurfaceError::CacheLockPoisoned)?;
            let current = self.loader.load(surface)?;
            if !Arc::ptr_eq(&current, &points) {
                debug!(surface = %surface, "Control points replaced during build; rebuilding");
                continue;
            }
            return Ok(Arc::clone(interpolants.entry(surface).or_insert(built)));
        }
    }

    fn build(surface: Surface, points: Arc<ControlPointSet>) -> Arc<SurfaceInterpolant> {
        let start = Instant::now();
        let built = Arc::new(SurfaceInterpolant::new(points));
        let elapsed = start.elapsed();

        if built.linear().is_degenerate() {
            warn!(
                surface = %surface,
                points = built.control_points().len(),
                "Control points cannot be triangulated; using nearest point everywhere"
            );
        }
        debug!(
            surface = %surface,
            points = built.control_points().len(),
            triangles = built.linear().triangle_count(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Built surface interpolant"
        );
        let labels = vec![("surface", surface.code().to_string())];
        metrics::histogram!(metric_defs::INTERPOLANT_BUILD_TIME.name, &labels)
            .record(elapsed.as_secs_f64() * 1000.0);

        built
    }

    /// Ellipsoidal height of a surface at each query point.
    ///
    /// The ellipsoid returns 0 for every point without loading anything.
    /// Points outside the triangulated hull take the height of the nearest
    /// control point.
    pub fn height_at(&self, surface: Surface, points: &[GeoPoint]) -> Result<Vec<f64>> {
        if surface.is_synthetic() {
            return Ok(vec![0.0; points.len()]);
        }

        let sample = self.interpolant(surface)?.heights(points);
        if sample.fallback_count > 0 {
            debug!(
                surface = %surface,
                fallback = sample.fallback_count,
                total = points.len(),
                "Used nearest control point outside triangulated hull"
            );
            let labels = vec![("surface", surface.code().to_string())];
            metrics::counter!(metric_defs::FALLBACK_POINTS.name, &labels)
                .increment(sample.fallback_count as u64);
        }

        Ok(sample.heights)
    }

    /// Whether a surface's height field has been built.
    pub fn is_built(&self, surface: Surface) -> bool {
        self.interpolants
            .read()
            .map(|c| c.contains_key(&surface))
            .unwrap_or(false)
    }
}
