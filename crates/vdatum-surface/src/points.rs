//! Control points and the three-column `lon lat value` text format.

use crate::Result;
use std::io::BufRead;
use std::path::Path;

/// A longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in decimal degrees (positive = east).
    pub lon: f64,
    /// Latitude in decimal degrees (positive = north).
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// One row of a three-column `lon lat value` file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyzRow {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Third column (height or measurement).
    pub value: f64,
}

impl XyzRow {
    /// The row's coordinates.
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Rows parsed from a three-column file together with the number of lines dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzRows {
    /// Rows that parsed as three floats, in file order.
    pub rows: Vec<XyzRow>,
    /// Non-blank lines that were skipped as malformed.
    pub skipped: usize,
}

/// Parse a single line. Fields beyond the third are ignored.
pub fn parse_xyz_line(line: &str) -> Option<XyzRow> {
    let mut fields = line.split_whitespace();
    let lon = fields.next()?.parse().ok()?;
    let lat = fields.next()?.parse().ok()?;
    let value = fields.next()?.parse().ok()?;
    Some(XyzRow { lon, lat, value })
}

/// Read `lon lat value` rows from a reader, skipping malformed lines.
///
/// Bytes that are not valid UTF-8 are replaced rather than treated as fatal.
pub fn read_xyz<R: BufRead>(mut reader: R) -> Result<XyzRows> {
    let mut parsed = XyzRows::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        match parse_xyz_line(&line) {
            Some(row) => parsed.rows.push(row),
            None => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

/// Read `lon lat value` rows from a file.
pub fn read_xyz_file<P: AsRef<Path>>(path: P) -> Result<XyzRows> {
    let file = std::fs::File::open(path)?;
    read_xyz(std::io::BufReader::new(file))
}

/// A scattered sample of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Ellipsoidal height in meters (up positive).
    pub height: f64,
}

impl ControlPoint {
    /// Create a control point.
    pub const fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }

    /// The point's planar position.
    pub const fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

impl From<XyzRow> for ControlPoint {
    fn from(row: XyzRow) -> Self {
        Self::new(row.lon, row.lat, row.value)
    }
}

/// The control points backing one surface.
///
/// Order is preserved from the source file and is what nearest-neighbour
/// ties are broken by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPointSet {
    points: Vec<ControlPoint>,
}

impl ControlPointSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The control points in source order.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Whether any point has a finite position and can anchor a height field.
    pub fn has_usable_points(&self) -> bool {
        self.points.iter().any(|p| p.position().is_finite())
    }

    /// Geographic bounds of the finite positions as
    /// `(min_lon, max_lon, min_lat, max_lat)`.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut usable = self.points.iter().filter(|p| p.position().is_finite());
        let first = usable.next()?;
        let init = (first.lon, first.lon, first.lat, first.lat);
        Some(usable.fold(init, |(w, e, s, n), p| {
            (w.min(p.lon), e.max(p.lon), s.min(p.lat), n.max(p.lat))
        }))
    }
}

impl From<Vec<ControlPoint>> for ControlPointSet {
    fn from(points: Vec<ControlPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<ControlPoint> for ControlPointSet {
    fn from_iter<I: IntoIterator<Item = ControlPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<XyzRows> for ControlPointSet {
    fn from(parsed: XyzRows) -> Self {
        parsed.rows.into_iter().map(ControlPoint::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let row = parse_xyz_line("  121.5\t24.0   1.25 extra").unwrap();
        assert_eq!(row, XyzRow { lon: 121.5, lat: 24.0, value: 1.25 });

        assert!(parse_xyz_line("121.5 24.0").is_none());
        assert!(parse_xyz_line("lon lat height").is_none());
        assert!(parse_xyz_line("121.5 abc 1.0").is_none());
    }

    #[test]
    fn test_read_skips_malformed_rows() {
        let text = "lon lat h\n120 24 1.0\n\n121 24\n121 25 0.9\nbad row here\n";
        let parsed = read_xyz(text.as_bytes()).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.rows[1], XyzRow { lon: 121.0, lat: 25.0, value: 0.9 });
    }

    #[test]
    fn test_read_tolerates_invalid_utf8() {
        let mut bytes = b"120 24 1.0\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"121 25 2.0");

        let parsed = read_xyz(bytes.as_slice()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_control_point_set_bounds() {
        let set: ControlPointSet = vec![
            ControlPoint::new(120.0, 24.0, 1.0),
            ControlPoint::new(121.0, 23.5, 1.2),
            ControlPoint::new(119.5, 25.0, 0.9),
        ]
        .into();

        assert_eq!(set.len(), 3);
        assert_eq!(set.bounds(), Some((119.5, 121.0, 23.5, 25.0)));
        assert_eq!(ControlPointSet::new().bounds(), None);
    }

    #[test]
    fn test_non_finite_positions_are_not_usable() {
        let set: ControlPointSet = vec![
            ControlPoint::new(f64::NAN, f64::NAN, 1.0),
            ControlPoint::new(f64::INFINITY, 24.0, 2.0),
        ]
        .into();
        assert!(!set.is_empty());
        assert!(!set.has_usable_points());
        assert_eq!(set.bounds(), None);

        let mixed: ControlPointSet = vec![
            ControlPoint::new(f64::NAN, 24.0, 1.0),
            ControlPoint::new(121.0, 24.5, f64::NAN),
        ]
        .into();
        assert!(mixed.has_usable_points());
        assert_eq!(mixed.bounds(), Some((121.0, 121.0, 24.5, 24.5)));
    }
}
