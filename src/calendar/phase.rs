use chrono::{NaiveDate, NaiveDateTime};
use std::f64::consts::TAU;

/// Seconds in one day; the period of the day-phase features.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default tropical orbit period in days.
///
/// Source: NSSDC Earth fact sheet.
pub const DEFAULT_ORBIT_PERIOD_DAYS: f64 = 365.242;

/// Maps a UTC timestamp onto the unit circle with the given period.
///
/// Returns `(sin(2π·t/period), cos(2π·t/period))`.
///
/// # Examples
///
/// ```
/// use irradiance_grid::calendar::cyclical_phase;
///
/// let (sin, cos) = cyclical_phase(21_600, 86_400.0); // 06:00 UTC
/// assert!((sin - 1.0).abs() < 1e-12);
/// assert!(cos.abs() < 1e-12);
/// ```
pub fn cyclical_phase(timestamp_seconds: i64, period_seconds: f64) -> (f64, f64) {
    (timestamp_seconds as f64 * (TAU / period_seconds)).sin_cos()
}

/// A sine/cosine pair as stored in the arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub sin: f32,
    pub cos: f32,
}

impl From<(f64, f64)> for Phase {
    fn from((sin, cos): (f64, f64)) -> Self {
        Self {
            sin: sin as f32,
            cos: cos as f32,
        }
    }
}

/// Computes the year- and day-phase features of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseEncoder {
    year_period_seconds: f64,
}

impl PhaseEncoder {
    /// Encoder using an orbit period of `orbit_days` days for the year phase.
    pub fn new(orbit_days: f64) -> Self {
        Self {
            year_period_seconds: orbit_days * SECONDS_PER_DAY,
        }
    }

    pub fn year_period_seconds(&self) -> f64 {
        self.year_period_seconds
    }

    pub fn year_phase(&self, timestamp_seconds: i64) -> Phase {
        cyclical_phase(timestamp_seconds, self.year_period_seconds).into()
    }

    pub fn day_phase(&self, timestamp_seconds: i64) -> Phase {
        cyclical_phase(timestamp_seconds, SECONDS_PER_DAY).into()
    }
}

impl Default for PhaseEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_ORBIT_PERIOD_DAYS)
    }
}

/// Midnight UTC on 1 January of `year`, as a naive UTC datetime.
pub(crate) fn year_start(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Unix timestamp of midnight UTC on 1 January of `year`.
///
/// Out-of-range years saturate to `i64::MIN`, which never occurs for years chrono can
/// represent.
pub fn year_start_timestamp(year: i32) -> i64 {
    year_start(year)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(i64::MIN)
}

/// Timestamp of the daily row `row` of `year` (row 0 is 1 January).
pub fn day_timestamp(year: i32, row: usize) -> i64 {
    year_start_timestamp(year) + row as i64 * SECONDS_PER_DAY as i64
}

/// Timestamp of the hourly row `row` of `year` (row 0 is 1 January, 00:00 UTC).
pub fn hour_timestamp(year: i32, row: usize) -> i64 {
    year_start_timestamp(year) + row as i64 * 3_600
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_phase_lies_on_unit_circle() {
        for t in [0_i64, 1, 3_600, 1_609_459_200, -86_400, 4_102_444_800] {
            for period in [SECONDS_PER_DAY, DEFAULT_ORBIT_PERIOD_DAYS * SECONDS_PER_DAY] {
                let (s, c) = cyclical_phase(t, period);
                assert!((s * s + c * c - 1.0).abs() < 1e-12, "t={} period={}", t, period);
            }
        }
    }

    #[test]
    fn test_phase_is_periodic() {
        let period = SECONDS_PER_DAY;
        for t in [0_i64, 7_200, 1_609_459_200] {
            let (s0, c0) = cyclical_phase(t, period);
            let (s1, c1) = cyclical_phase(t + period as i64, period);
            assert!((s0 - s1).abs() < 1e-9);
            assert!((c0 - c1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_year_phase_is_periodic_over_orbit() {
        let encoder = PhaseEncoder::default();
        let period = encoder.year_period_seconds() as i64;
        let t = 1_609_459_200;
        let a = encoder.year_phase(t);
        let b = encoder.year_phase(t + period);
        assert!((a.sin - b.sin).abs() < 1e-6);
        assert!((a.cos - b.cos).abs() < 1e-6);
    }

    #[test]
    fn test_day_phase_at_midnight() {
        let encoder = PhaseEncoder::default();
        let midnight = Utc.with_ymd_and_hms(2021, 5, 17, 0, 0, 0).unwrap().timestamp();
        let phase = encoder.day_phase(midnight);
        assert!(phase.sin.abs() < 1e-6);
        assert!((phase.cos - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_row_timestamps() {
        let jan_1 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap().timestamp();
        assert_eq!(year_start_timestamp(2021), jan_1);
        assert_eq!(
            day_timestamp(2021, 31),
            Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap().timestamp()
        );
        assert_eq!(
            hour_timestamp(2021, 25),
            Utc.with_ymd_and_hms(2021, 1, 2, 1, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_encoder_uses_orbit_period() {
        let encoder = PhaseEncoder::new(1.0);
        assert_eq!(encoder.year_period_seconds(), SECONDS_PER_DAY);
        assert_eq!(encoder.year_phase(3_600), encoder.day_phase(3_600));
    }
}
