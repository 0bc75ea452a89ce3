//! Geographic primitives: coordinates, named locations, area sizes and bounding boxes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places kept when deriving bounding-box edges, so that query strings are stable.
const COORDINATE_DECIMALS: i32 = 6;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use irradiance_grid::LatLon;
///
/// let bhadla = LatLon(27.539669, 71.915253);
/// assert_eq!(bhadla.0, 27.539669); // Latitude
/// assert_eq!(bhadla.1, 71.915253); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0, self.1)
    }
}

/// A configured target location. Its position in the location set is its patch index.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub coordinate: LatLon,
}

impl Location {
    pub fn new(name: impl Into<String>, coordinate: LatLon) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// Size of the region around each location, in degrees.
///
/// `width` spans latitude and `height` spans longitude. POWER's regional grid has a
/// half-degree resolution, so every degree contributes two grid steps per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSpec {
    pub width: f64,
    pub height: f64,
}

impl AreaSpec {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Number of region grid cells `F = (width * 2) * (height * 2)`.
    pub fn cell_count(&self) -> usize {
        (self.width * 2.0 * self.height * 2.0) as usize
    }
}

/// Axis-aligned box around a location, as sent to the regional endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Box of `area` centred on `center`, with every edge rounded to six decimals.
    ///
    /// Coordinates are not clamped to the valid latitude/longitude ranges; boxes that
    /// cross a pole or the antimeridian are passed to the API as computed.
    ///
    /// # Examples
    ///
    /// ```
    /// use irradiance_grid::{AreaSpec, BoundingBox, LatLon};
    ///
    /// let bbox = BoundingBox::around(LatLon(23.25991, 77.41261), AreaSpec::new(2.0, 2.0));
    /// assert_eq!(bbox.lat_min, 22.25991);
    /// assert_eq!(bbox.lon_max, 78.41261);
    /// ```
    pub fn around(center: LatLon, area: AreaSpec) -> Self {
        let half_width = area.width / 2.0;
        let half_height = area.height / 2.0;
        Self {
            lat_min: round_coordinate(center.0 - half_width),
            lat_max: round_coordinate(center.0 + half_width),
            lon_min: round_coordinate(center.1 - half_height),
            lon_max: round_coordinate(center.1 + half_height),
        }
    }

    pub fn center(&self) -> LatLon {
        LatLon(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_bounding_box_extent_and_center() {
        let cases = [
            (LatLon(23.25991, 77.41261), AreaSpec::new(2.0, 2.0)),
            (LatLon(9.347568, 78.392162), AreaSpec::new(1.5, 3.0)),
            (LatLon(-33.8688, 151.2093), AreaSpec::new(0.5, 0.5)),
            (LatLon(0.0, 0.0), AreaSpec::new(4.0, 1.0)),
        ];
        for (center, area) in cases {
            let bbox = BoundingBox::around(center, area);
            assert!((bbox.lat_max - bbox.lat_min - area.width).abs() < TOLERANCE);
            assert!((bbox.lon_max - bbox.lon_min - area.height).abs() < TOLERANCE);
            let mid = bbox.center();
            assert!((mid.0 - center.0).abs() < TOLERANCE);
            assert!((mid.1 - center.1).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_bounding_box_is_rounded_to_six_decimals() {
        let bbox = BoundingBox::around(LatLon(27.5396691234, 71.9152539876), AreaSpec::new(1.0, 1.0));
        assert_eq!(bbox.lat_min, 27.039669);
        assert_eq!(bbox.lat_max, 28.039669);
        assert_eq!(bbox.lon_min, 71.415254);
        assert_eq!(bbox.lon_max, 72.415254);
    }

    #[test]
    fn test_bounding_box_is_not_clamped() {
        let bbox = BoundingBox::around(LatLon(89.5, 179.5), AreaSpec::new(2.0, 2.0));
        assert_eq!(bbox.lat_max, 90.5);
        assert_eq!(bbox.lon_max, 180.5);
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(AreaSpec::new(2.0, 2.0).cell_count(), 16);
        assert_eq!(AreaSpec::new(1.5, 1.0).cell_count(), 6);
        assert_eq!(AreaSpec::new(0.5, 0.5).cell_count(), 1);
    }
}
