//! Control-point loading with a per-surface cache.

use crate::points::read_xyz_file;
use crate::{ControlPointSet, Result, Surface, SurfaceCatalog, SurfaceError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Loads the control points backing each surface, once per surface.
///
/// Loaded sets are kept for the lifetime of the loader; surface files are
/// treated as immutable for the session. Concurrent first loads of the same
/// surface may both read the file, but only the first result is published.
#[derive(Debug)]
pub struct PointCloudLoader {
    catalog: SurfaceCatalog,
    cache: RwLock<HashMap<Surface, Arc<ControlPointSet>>>,
}

impl PointCloudLoader {
    /// Create a loader that resolves files through the given catalog.
    pub fn new(catalog: SurfaceCatalog) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog used to locate surface files.
    pub fn catalog(&self) -> &SurfaceCatalog {
        &self.catalog
    }

    /// Load (or fetch from cache) the control points of a surface.
    ///
    /// The ellipsoid always yields an empty set without touching the catalog.
    /// Malformed rows are dropped; a file with no usable rows gives an empty set.
    pub fn load(&self, surface: Surface) -> Result<Arc<ControlPointSet>> {
        if surface.is_synthetic() {
            return Ok(Arc::new(ControlPointSet::new()));
        }

        {
            let cache = self.cache.read().map_err(|_| SurfaceError::CacheLockPoisoned)?;
            if let Some(points) = cache.get(&surface) {
                return Ok(Arc::clone(points));
            }
        }

        let loaded = Arc::new(self.read_surface(surface)?);

        let mut cache = self.cache.write().map_err(|_| SurfaceError::CacheLockPoisoned)?;
        Ok(Arc::clone(cache.entry(surface).or_insert(loaded)))
    }

    /// Register control points for a surface without reading its file.
    ///
    /// Replaces anything previously cached for the surface. Ignored for the
    /// ellipsoid.
    pub fn insert(&self, surface: Surface, points: ControlPointSet) -> Result<()> {
        if surface.is_synthetic() {
            return Ok(());
        }
        let mut cache = self.cache.write().map_err(|_| SurfaceError::CacheLockPoisoned)?;
        cache.insert(surface, Arc::new(points));
        Ok(())
    }

    /// Whether a surface's points are already in memory.
    pub fn is_loaded(&self, surface: Surface) -> bool {
        self.cache
            .read()
            .map(|c| c.contains_key(&surface))
            .unwrap_or(false)
    }

    fn read_surface(&self, surface: Surface) -> Result<ControlPointSet> {
        let path = self
            .catalog
            .path_for(surface)
            .ok_or(SurfaceError::InsufficientData(surface))?;

        if !path.is_file() {
            return Err(SurfaceError::MissingData { surface, path });
        }

        let parsed = read_xyz_file(&path)?;
        if parsed.skipped > 0 {
            warn!(
                surface = %surface,
                path = %path.display(),
                skipped = parsed.skipped,
                "Skipped malformed control-point rows"
            );
        }
        let points = ControlPointSet::from(parsed);
        match points.bounds() {
            Some((west, east, south, north)) => debug!(
                surface = %surface,
                path = %path.display(),
                points = points.len(),
                west,
                east,
                south,
                north,
                "Loaded control points"
            ),
            None => warn!(
                surface = %surface,
                path = %path.display(),
                points = points.len(),
                "Surface file has no control points with finite coordinates"
            ),
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlPoint;
    use std::io::Write;

    #[test]
    fn test_ellipsoid_is_empty_without_files() {
        let loader = PointCloudLoader::new(SurfaceCatalog::new("/nonexistent/dir"));
        let points = loader.load(Surface::Ellipsoid).unwrap();
        assert!(points.is_empty());
        assert!(!loader.is_loaded(Surface::Ellipsoid));
    }

    #[test]
    fn test_missing_file() {
        let loader = PointCloudLoader::new(SurfaceCatalog::new("/nonexistent/dir"));
        match loader.load(Surface::Mss) {
            Err(SurfaceError::MissingData { surface, path }) => {
                assert_eq!(surface, Surface::Mss);
                assert!(path.ends_with("MSS.xyz"));
            }
            other => panic!("expected MissingData, got {:?}", other),
        }
    }

    #[test]
    fn test_load_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HAT.xyz");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "120 24 1.5").unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file, "121 24 1.7").unwrap();
        drop(file);

        let loader = PointCloudLoader::new(SurfaceCatalog::new(dir.path()));
        let first = loader.load(Surface::Hat).unwrap();
        assert_eq!(first.len(), 2);
        assert!(loader.is_loaded(Surface::Hat));

        // The file changing on disk does not affect the cached set.
        std::fs::remove_file(&path).unwrap();
        let second = loader.load(Surface::Hat).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_insert_in_memory_points() {
        let loader = PointCloudLoader::new(SurfaceCatalog::new("/nonexistent/dir"));
        loader
            .insert(
                Surface::Geoid,
                vec![ControlPoint::new(120.0, 24.0, 19.5)].into(),
            )
            .unwrap();

        let points = loader.load(Surface::Geoid).unwrap();
        assert_eq!(points.points()[0].height, 19.5);
    }
}
