//! Defines the cadences and record kinds requested from the NASA POWER API.

use std::fmt;

/// Temporal resolution of a POWER time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// One value per day, keyed `YYYYMMDD`.
    Daily,
    /// One value per hour, keyed `YYYYMMDDHH`.
    Hourly,
}

impl Cadence {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Hourly => "hourly",
        }
    }

    /// Array rows per calendar day at this cadence.
    pub fn rows_per_day(&self) -> usize {
        match self {
            Cadence::Daily => 1,
            Cadence::Hourly => 24,
        }
    }

    /// Human-readable form of the time-key layout, used in error messages.
    pub fn time_key_format(&self) -> &'static str {
        match self {
            Cadence::Daily => "%Y%m%d",
            Cadence::Hourly => "%Y%m%d%H",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Spatial shape of a POWER request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spatial {
    /// A grid of half-degree cells inside a bounding box.
    Regional,
    /// A single coordinate.
    Point,
}

impl Spatial {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Spatial::Regional => "regional",
            Spatial::Point => "point",
        }
    }
}

/// The three payloads downloaded for every `(year, location)` pair.
///
/// # Examples
///
/// ```
/// use irradiance_grid::{Cadence, RecordKind};
///
/// assert_eq!(RecordKind::PointHourly.cadence(), Cadence::Hourly);
/// assert_eq!(RecordKind::RegionDaily.to_string(), "region-daily");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Daily grid around the location; feeds the input array `X`.
    RegionDaily,
    /// Daily series at the location; feeds `y_daily`.
    PointDaily,
    /// Hourly series at the location; feeds `y_hourly`.
    PointHourly,
}

impl RecordKind {
    pub fn cadence(&self) -> Cadence {
        match self {
            RecordKind::RegionDaily | RecordKind::PointDaily => Cadence::Daily,
            RecordKind::PointHourly => Cadence::Hourly,
        }
    }

    pub fn spatial(&self) -> Spatial {
        match self {
            RecordKind::RegionDaily => Spatial::Regional,
            RecordKind::PointDaily | RecordKind::PointHourly => Spatial::Point,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            RecordKind::RegionDaily => "region-daily",
            RecordKind::PointDaily => "point-daily",
            RecordKind::PointHourly => "point-hourly",
        }
    }

    pub(crate) fn cache_file_prefix(&self) -> String {
        format!("{}-", self.label())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
