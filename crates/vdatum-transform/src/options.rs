//! Transform options shared by single-point and bulk callers.

use crate::{Envelope, ValueKind};
use serde::{Deserialize, Serialize};
use vdatum_surface::Surface;

/// Which surfaces to convert between, and how to read the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformOptions {
    /// Surface the input values are expressed against.
    #[serde(default = "default_input_surface")]
    pub input_surface: Surface,
    /// Surface to re-express the values against.
    #[serde(default = "default_output_surface")]
    pub output_surface: Surface,
    /// Meaning of the input values.
    #[serde(default)]
    pub value_kind: ValueKind,
    /// Region in which points are transformed.
    #[serde(default)]
    pub envelope: Envelope,
}

fn default_input_surface() -> Surface {
    Surface::Mss
}

fn default_output_surface() -> Surface {
    Surface::Hat
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            input_surface: default_input_surface(),
            output_surface: default_output_surface(),
            value_kind: ValueKind::default(),
            envelope: Envelope::default(),
        }
    }
}

impl TransformOptions {
    /// Options for a specific surface pair with default kind and envelope.
    pub fn new(input_surface: Surface, output_surface: Surface) -> Self {
        Self {
            input_surface,
            output_surface,
            ..Self::default()
        }
    }

    /// Set the value kind.
    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
        self.value_kind = value_kind;
        self
    }

    /// Set the envelope.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TransformOptions::default();
        assert_eq!(options.input_surface, Surface::Mss);
        assert_eq!(options.output_surface, Surface::Hat);
        assert_eq!(options.value_kind, ValueKind::Depth);
        assert_eq!(options.envelope, Envelope::default());
    }

    #[test]
    fn test_yaml_empty_uses_defaults() {
        let options: TransformOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
input_surface: LAT
output_surface: EL
value_kind: ELLI_BED
envelope:
  lon_min: 119.0
  lon_max: 122.0
  lat_min: 22.0
  lat_max: 25.0
"#;
        let options: TransformOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.input_surface, Surface::Lat);
        assert_eq!(options.output_surface, Surface::Ellipsoid);
        assert_eq!(options.value_kind, ValueKind::EllipsoidalBedHeight);
        assert_eq!(options.envelope, Envelope::new(119.0, 122.0, 22.0, 25.0));
    }

    #[test]
    fn test_yaml_rejects_unknown_kind() {
        let result: Result<TransformOptions, _> = serde_yaml::from_str("value_kind: SOUNDING");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let options = TransformOptions::new(Surface::Geoid, Surface::Islw)
            .with_value_kind(ValueKind::EllipsoidalBedHeight)
            .with_envelope(Envelope::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(options.input_surface, Surface::Geoid);
        assert_eq!(options.output_surface, Surface::Islw);
        assert_eq!(options.value_kind, ValueKind::EllipsoidalBedHeight);
        assert_eq!(options.envelope.lon_max, 1.0);
    }
}
