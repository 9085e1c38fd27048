//! Reference surface definitions and the catalog of their data files.

use crate::{Result, SurfaceError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default directory holding the control-point files.
pub const DEFAULT_DATA_DIR: &str = "file";

/// A named vertical reference surface.
///
/// Every variant except [`Surface::Ellipsoid`] is backed by a control-point
/// file. The ellipsoid is the zero surface: its height is 0 everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Surface {
    /// Mean Sea Surface.
    Mss,
    /// Highest Astronomical Tide.
    Hat,
    /// Mean High Water.
    Mhw,
    /// Mean Low Water.
    Mlw,
    /// Lowest Astronomical Tide.
    Lat,
    /// Indian Spring Low Water.
    Islw,
    /// Geoid.
    Geoid,
    /// Reference ellipsoid (zero surface).
    Ellipsoid,
}

impl Surface {
    /// All surfaces in their canonical order.
    pub const ALL: [Surface; 8] = [
        Surface::Mss,
        Surface::Hat,
        Surface::Mhw,
        Surface::Mlw,
        Surface::Lat,
        Surface::Islw,
        Surface::Geoid,
        Surface::Ellipsoid,
    ];

    /// Human-readable name.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Surface::Mss => "Mean Sea Surface (MSS)",
            Surface::Hat => "Highest Astronomical Tide (HAT)",
            Surface::Mhw => "Mean High Water (MHW)",
            Surface::Mlw => "Mean Low Water (MLW)",
            Surface::Lat => "Lowest Astronomical Tide (LAT)",
            Surface::Islw => "Indian Spring Low Water (ISLW)",
            Surface::Geoid => "Geoid",
            Surface::Ellipsoid => "Ellipsoid",
        }
    }

    /// Short code used in labels and on the command line.
    pub const fn code(&self) -> &'static str {
        match self {
            Surface::Mss => "MSS",
            Surface::Hat => "HAT",
            Surface::Mhw => "MHW",
            Surface::Mlw => "MLW",
            Surface::Lat => "LAT",
            Surface::Islw => "ISLW",
            Surface::Geoid => "Geoid",
            Surface::Ellipsoid => "EL",
        }
    }

    /// File name of the control points inside the data directory.
    ///
    /// Returns `None` for the ellipsoid, which has no backing data.
    pub const fn default_file_name(&self) -> Option<&'static str> {
        match self {
            Surface::Mss => Some("MSS.xyz"),
            Surface::Hat => Some("HAT.xyz"),
            Surface::Mhw => Some("MHW.xyz"),
            Surface::Mlw => Some("MLW.xyz"),
            Surface::Lat => Some("LAT.xyz"),
            Surface::Islw => Some("ISLW.xyz"),
            Surface::Geoid => Some("geoid.xyz"),
            Surface::Ellipsoid => None,
        }
    }

    /// Whether this surface is the synthetic zero surface.
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Surface::Ellipsoid)
    }

    /// Position of this surface in [`Surface::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a surface by its position in [`Surface::ALL`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Surface {
    type Err = SurfaceError;

    /// Accepts the short code, the variant name or the numeric index.
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        if let Ok(index) = needle.parse::<usize>() {
            return Self::from_index(index)
                .ok_or_else(|| SurfaceError::UnknownSurface(needle.to_string()));
        }

        let lower = needle.to_ascii_lowercase();
        if lower == "ellipsoid" {
            return Ok(Surface::Ellipsoid);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|surface| surface.code().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| SurfaceError::UnknownSurface(needle.to_string()))
    }
}

impl TryFrom<String> for Surface {
    type Error = SurfaceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Surface> for String {
    fn from(surface: Surface) -> Self {
        surface.code().to_string()
    }
}

/// Static mapping from surfaces to the files holding their control points.
///
/// Paths resolve to `data_dir/<default file name>` unless overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceCatalog {
    data_dir: PathBuf,
    overrides: HashMap<Surface, PathBuf>,
}

impl Default for SurfaceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl SurfaceCatalog {
    /// Create a catalog rooted at the given data directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            overrides: HashMap::new(),
        }
    }

    /// Use an explicit file for one surface instead of the default name.
    ///
    /// Overrides for the ellipsoid are ignored.
    pub fn with_file<P: AsRef<Path>>(mut self, surface: Surface, path: P) -> Self {
        if !surface.is_synthetic() {
            self.overrides.insert(surface, path.as_ref().to_path_buf());
        }
        self
    }

    /// Directory the default file names are resolved against.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve the control-point file for a surface.
    pub fn path_for(&self, surface: Surface) -> Option<PathBuf> {
        if let Some(path) = self.overrides.get(&surface) {
            return Some(path.clone());
        }
        surface
            .default_file_name()
            .map(|name| self.data_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_codes_and_order() {
        let codes: Vec<_> = Surface::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, ["MSS", "HAT", "MHW", "MLW", "LAT", "ISLW", "Geoid", "EL"]);
        assert_eq!(Surface::Ellipsoid.index(), 7);
        assert_eq!(Surface::from_index(1), Some(Surface::Hat));
        assert_eq!(Surface::from_index(8), None);
    }

    #[test]
    fn test_surface_from_str() {
        assert_eq!("mss".parse::<Surface>().unwrap(), Surface::Mss);
        assert_eq!("GEOID".parse::<Surface>().unwrap(), Surface::Geoid);
        assert_eq!("EL".parse::<Surface>().unwrap(), Surface::Ellipsoid);
        assert_eq!("ellipsoid".parse::<Surface>().unwrap(), Surface::Ellipsoid);
        assert_eq!("4".parse::<Surface>().unwrap(), Surface::Lat);
        assert!(matches!(
            "CD".parse::<Surface>(),
            Err(SurfaceError::UnknownSurface(_))
        ));
        assert!("9".parse::<Surface>().is_err());
    }

    #[test]
    fn test_only_ellipsoid_is_synthetic() {
        for surface in Surface::ALL {
            assert_eq!(surface.is_synthetic(), surface.default_file_name().is_none());
        }
        assert!(Surface::Ellipsoid.is_synthetic());
    }

    #[test]
    fn test_catalog_paths() {
        let catalog = SurfaceCatalog::new("data").with_file(Surface::Hat, "/tmp/hat_v2.xyz");

        assert_eq!(
            catalog.path_for(Surface::Mss),
            Some(PathBuf::from("data").join("MSS.xyz"))
        );
        assert_eq!(
            catalog.path_for(Surface::Geoid),
            Some(PathBuf::from("data").join("geoid.xyz"))
        );
        assert_eq!(catalog.path_for(Surface::Hat), Some(PathBuf::from("/tmp/hat_v2.xyz")));
        assert_eq!(catalog.path_for(Surface::Ellipsoid), None);
    }

    #[test]
    fn test_catalog_ignores_ellipsoid_override() {
        let catalog = SurfaceCatalog::default().with_file(Surface::Ellipsoid, "zero.xyz");
        assert_eq!(catalog.path_for(Surface::Ellipsoid), None);
        assert_eq!(catalog.data_dir(), Path::new(DEFAULT_DATA_DIR));
    }
}
