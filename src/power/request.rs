//! Query construction for the POWER temporal endpoints.

use crate::types::geo::{BoundingBox, LatLon};
use crate::types::record_kind::RecordKind;
use chrono::{Datelike, NaiveDate};

/// Public POWER API root.
pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov/api";
/// All-sky surface shortwave downward irradiance.
pub const DEFAULT_PARAMETER: &str = "ALLSKY_SFC_SW_DWN";
/// Renewable-energy user community.
pub const DEFAULT_COMMUNITY: &str = "re";

const DATE_FORMAT: &str = "%Y%m%d";

/// Where a request is pointed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryTarget {
    Region(BoundingBox),
    Point(LatLon),
}

/// One POWER request: a record kind, a date span inside a single year, and a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRequest {
    pub kind: RecordKind,
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target: QueryTarget,
}

impl PowerRequest {
    pub fn region_daily(start: NaiveDate, end: NaiveDate, area: BoundingBox) -> Self {
        Self::new(RecordKind::RegionDaily, start, end, QueryTarget::Region(area))
    }

    pub fn point_daily(start: NaiveDate, end: NaiveDate, coordinate: LatLon) -> Self {
        Self::new(RecordKind::PointDaily, start, end, QueryTarget::Point(coordinate))
    }

    pub fn point_hourly(start: NaiveDate, end: NaiveDate, coordinate: LatLon) -> Self {
        Self::new(RecordKind::PointHourly, start, end, QueryTarget::Point(coordinate))
    }

    fn new(kind: RecordKind, start: NaiveDate, end: NaiveDate, target: QueryTarget) -> Self {
        Self {
            kind,
            year: start.year(),
            start,
            end,
            target,
        }
    }

    /// Full request URL below `base_url`.
    pub fn url(&self, base_url: &str, community: &str, parameter: &str) -> String {
        let location = match self.target {
            QueryTarget::Region(area) => format!(
                "latitude-min={}&latitude-max={}&longitude-min={}&longitude-max={}",
                area.lat_min, area.lat_max, area.lon_min, area.lon_max
            ),
            QueryTarget::Point(coordinate) => {
                format!("latitude={}&longitude={}", coordinate.0, coordinate.1)
            }
        };
        format!(
            "{}/temporal/{}/{}?start={}&end={}&{}&community={}&parameters={}&format=json&header=true&time-standard=utc",
            base_url.trim_end_matches('/'),
            self.kind.cadence().path_segment(),
            self.kind.spatial().path_segment(),
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT),
            location,
            community,
            parameter,
        )
    }

    /// File name under which the raw response is cached.
    pub(crate) fn cache_file_name(&self, community: &str, parameter: &str) -> String {
        let target = match self.target {
            QueryTarget::Region(area) => format!(
                "{}_{}_{}_{}",
                area.lat_min, area.lat_max, area.lon_min, area.lon_max
            ),
            QueryTarget::Point(coordinate) => format!("{}_{}", coordinate.0, coordinate.1),
        };
        format!(
            "{}{}-{}-{}-{}-{}.json",
            self.kind.cache_file_prefix(),
            community,
            parameter,
            target,
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT),
        )
    }
}
