//! Measurement value kinds and their sign conventions.

use crate::TransformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an input measurement represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    /// Depth below the input surface, positive down.
    #[default]
    Depth,
    /// Ellipsoidal height of the seabed, positive up.
    EllipsoidalBedHeight,
}

impl ValueKind {
    /// Every value kind.
    pub const ALL: [ValueKind; 2] = [ValueKind::Depth, ValueKind::EllipsoidalBedHeight];

    /// Canonical tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            ValueKind::Depth => "DEPTH",
            ValueKind::EllipsoidalBedHeight => "ELLI_BED",
        }
    }

    /// Human-readable description including the axis direction.
    pub const fn description(&self) -> &'static str {
        match self {
            ValueKind::Depth => "Depth (down +)",
            ValueKind::EllipsoidalBedHeight => "Ellipsoidal bed height (up +)",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ValueKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "depth" => Ok(ValueKind::Depth),
            "elli_bed" | "ellipsoidal_bed_height" => Ok(ValueKind::EllipsoidalBedHeight),
            _ => Err(TransformError::InvalidValueKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for ValueKind {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.tag().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("DEPTH".parse::<ValueKind>().unwrap(), ValueKind::Depth);
        assert_eq!("depth".parse::<ValueKind>().unwrap(), ValueKind::Depth);
        assert_eq!(
            "ELLI_BED".parse::<ValueKind>().unwrap(),
            ValueKind::EllipsoidalBedHeight
        );
        assert_eq!(
            "ellipsoidal-bed-height".parse::<ValueKind>().unwrap(),
            ValueKind::EllipsoidalBedHeight
        );
    }

    #[test]
    fn test_unknown_tag() {
        match "HEIGHT".parse::<ValueKind>() {
            Err(TransformError::InvalidValueKind(tag)) => assert_eq!(tag, "HEIGHT"),
            other => panic!("expected InvalidValueKind, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_round_trip_through_display() {
        for kind in ValueKind::ALL {
            assert_eq!(kind.to_string().parse::<ValueKind>().unwrap(), kind);
        }
    }
}
