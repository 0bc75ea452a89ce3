use std::path::PathBuf;
use thiserror::Error;

/// Problems with the requested run, detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Year range is inverted: start {start} is after end {end}")]
    InvertedYearRange { start: i32, end: i32 },

    #[error("Year end {year_end} is in the future (current year is {current_year})")]
    YearInFuture { year_end: i32, current_year: i32 },

    #[error("Area must have a positive, finite width and height (got {width} x {height})")]
    InvalidArea { width: f64, height: f64 },

    #[error("Area {width} x {height} yields no region grid cells")]
    EmptyRegion { width: f64, height: f64 },

    #[error("No target locations configured")]
    NoLocations,

    #[error("Duplicate target location '{0}'")]
    DuplicateLocation(String),

    #[error("Failed to read location file '{0}'")]
    LocationsRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse location file '{0}'")]
    LocationsParse(PathBuf, #[source] serde_yaml::Error),

    #[error("Orbit period must be positive and finite (got {0} days)")]
    InvalidOrbitPeriod(f64),

    #[error("At least one concurrent request is required")]
    ZeroConcurrency,
}
