use crate::calendar::DEFAULT_ORBIT_PERIOD_DAYS;
use crate::config::error::ConfigError;
use crate::types::arrays::SENTINEL;
use crate::types::geo::AreaSpec;
use crate::types::time_range::TimeRange;
use bon::bon;

/// Validated parameters of one assembly run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblySettings {
    time_range: TimeRange,
    area: AreaSpec,
    orbit_period_days: f64,
    max_concurrent_requests: usize,
    sentinel: f32,
}

#[bon]
impl AssemblySettings {
    /// Creates the settings for a run.
    ///
    /// # Arguments
    ///
    /// * `time_range` - The already validated year range.
    /// * `area` - Region size around every location, in degrees.
    /// * `orbit_period_days` - Optional. Length of the year used for the year phase.
    ///   Defaults to `365.242`.
    /// * `max_concurrent_requests` - Optional. Locations of one year fetched at the same
    ///   time. Defaults to `1`, a strictly sequential run.
    /// * `sentinel` - Optional. Value for missing irradiance. Defaults to `-1`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the area is not positive and finite, covers no grid
    /// cell, the orbit period is not positive and finite, or zero concurrency is requested.
    #[builder]
    pub fn new(
        time_range: TimeRange,
        area: AreaSpec,
        orbit_period_days: Option<f64>,
        max_concurrent_requests: Option<usize>,
        sentinel: Option<f32>,
    ) -> Result<Self, ConfigError> {
        let orbit_period_days = orbit_period_days.unwrap_or(DEFAULT_ORBIT_PERIOD_DAYS);
        let max_concurrent_requests = max_concurrent_requests.unwrap_or(1);

        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(area.width) || !valid(area.height) {
            return Err(ConfigError::InvalidArea {
                width: area.width,
                height: area.height,
            });
        }
        if area.cell_count() == 0 {
            return Err(ConfigError::EmptyRegion {
                width: area.width,
                height: area.height,
            });
        }
        if !valid(orbit_period_days) {
            return Err(ConfigError::InvalidOrbitPeriod(orbit_period_days));
        }
        if max_concurrent_requests == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(Self {
            time_range,
            area,
            orbit_period_days,
            max_concurrent_requests,
            sentinel: sentinel.unwrap_or(SENTINEL),
        })
    }
}

impl AssemblySettings {
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn area(&self) -> AreaSpec {
        self.area
    }

    pub fn orbit_period_days(&self) -> f64 {
        self.orbit_period_days
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    pub fn sentinel(&self) -> f32 {
        self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> TimeRange {
        TimeRange::new(2021, 2021, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = AssemblySettings::builder()
            .time_range(range())
            .area(AreaSpec::new(2.0, 2.0))
            .build()
            .unwrap();
        assert_eq!(settings.orbit_period_days(), 365.242);
        assert_eq!(settings.max_concurrent_requests(), 1);
        assert_eq!(settings.sentinel(), -1.0);
    }

    #[test]
    fn test_rejects_invalid_area() {
        for (width, height) in [(0.0, 2.0), (2.0, -1.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            let err = AssemblySettings::builder()
                .time_range(range())
                .area(AreaSpec::new(width, height))
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidArea { .. }), "{width} x {height}");
        }
    }

    #[test]
    fn test_rejects_area_without_cells() {
        let err = AssemblySettings::builder()
            .time_range(range())
            .area(AreaSpec::new(0.2, 0.2))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRegion { .. }));
    }

    #[test]
    fn test_rejects_bad_orbit_and_concurrency() {
        let err = AssemblySettings::builder()
            .time_range(range())
            .area(AreaSpec::new(1.0, 1.0))
            .orbit_period_days(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrbitPeriod(_)));

        let err = AssemblySettings::builder()
            .time_range(range())
            .area(AreaSpec::new(1.0, 1.0))
            .max_concurrent_requests(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }
}
