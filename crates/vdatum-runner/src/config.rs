//! YAML configuration for the runner.
//!
//! ```yaml
//! data_dir: /srv/vdatum/file
//! files:
//!   Geoid: /srv/vdatum/geoid_2024.xyz
//! transform:
//!   input_surface: MSS
//!   output_surface: LAT
//!   value_kind: DEPTH
//! ```
//!
//! Every field is optional. Relative override paths are resolved against
//! `data_dir`.

use crate::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use vdatum_surface::{Surface, SurfaceCatalog, DEFAULT_DATA_DIR};
use vdatum_transform::TransformOptions;

/// Runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VdatumConfig {
    /// Directory holding the surface files.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Per-surface data file overrides.
    #[serde(default)]
    pub files: BTreeMap<Surface, PathBuf>,
    /// Default surfaces, value kind and envelope.
    #[serde(default)]
    pub transform: TransformOptions,
}

impl VdatumConfig {
    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RunnerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document is null, not an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Effective data directory, with `override_dir` taking precedence.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Build the surface catalog.
    pub fn catalog(&self, override_dir: Option<&Path>) -> SurfaceCatalog {
        let data_dir = self.resolve_data_dir(override_dir);
        let mut catalog = SurfaceCatalog::new(&data_dir);
        for (&surface, path) in &self.files {
            catalog = catalog.with_file(surface, data_dir.join(path));
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdatum_transform::{Envelope, ValueKind};

    #[test]
    fn test_empty_config() {
        let config = VdatumConfig::from_yaml_str("").unwrap();
        assert_eq!(config, VdatumConfig::default());
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("file"));
        assert_eq!(config.transform, TransformOptions::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
data_dir: /data/surfaces
files:
  Geoid: geoid_2024.xyz
  lat: /elsewhere/LAT_v2.xyz
transform:
  input_surface: Geoid
  output_surface: LAT
  value_kind: ELLI_BED
  envelope:
    lon_min: 119.0
    lon_max: 123.0
    lat_min: 21.5
    lat_max: 26.0
"#;
        let config = VdatumConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.transform.input_surface, Surface::Geoid);
        assert_eq!(config.transform.output_surface, Surface::Lat);
        assert_eq!(config.transform.value_kind, ValueKind::EllipsoidalBedHeight);
        assert_eq!(config.transform.envelope, Envelope::new(119.0, 123.0, 21.5, 26.0));

        let catalog = config.catalog(None);
        assert_eq!(
            catalog.path_for(Surface::Geoid),
            Some(PathBuf::from("/data/surfaces/geoid_2024.xyz"))
        );
        assert_eq!(
            catalog.path_for(Surface::Lat),
            Some(PathBuf::from("/elsewhere/LAT_v2.xyz"))
        );
        assert_eq!(
            catalog.path_for(Surface::Mss),
            Some(PathBuf::from("/data/surfaces/MSS.xyz"))
        );
    }

    #[test]
    fn test_data_dir_override() {
        let config = VdatumConfig::from_yaml_str("data_dir: /from/config").unwrap();
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("/from/config"));
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = VdatumConfig::from_yaml_str("datadir: oops");
        assert!(matches!(result, Err(RunnerError::ConfigParse(_))));
    }

    #[test]
    fn test_unknown_surface_rejected() {
        let result = VdatumConfig::from_yaml_str("files:\n  XYZ: foo.xyz");
        assert!(matches!(result, Err(RunnerError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = VdatumConfig::load("/nonexistent/vdatum.yaml");
        assert!(matches!(result, Err(RunnerError::ConfigRead { .. })));
    }
}
