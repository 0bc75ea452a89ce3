//! Year ranges and the array dimensions derived from them.

use crate::calendar::{
    days_in_year, leap_years_in_range, usable_days, DAYS_IN_COMMON_YEAR, HOURS_PER_DAY,
};
use crate::config::ConfigError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::RangeInclusive;

/// Inclusive range of calendar years to download, validated against "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    year_start: i32,
    year_end: i32,
    today: NaiveDate,
}

impl TimeRange {
    /// Validates `year_start..=year_end` as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvertedYearRange`] if `year_start > year_end` and
    /// [`ConfigError::YearInFuture`] if `year_end` is after `today`'s year.
    pub fn new(year_start: i32, year_end: i32, today: NaiveDate) -> Result<Self, ConfigError> {
        if year_start > year_end {
            return Err(ConfigError::InvertedYearRange {
                start: year_start,
                end: year_end,
            });
        }
        if year_end > today.year() {
            return Err(ConfigError::YearInFuture {
                year_end,
                current_year: today.year(),
            });
        }
        Ok(Self {
            year_start,
            year_end,
            today,
        })
    }

    pub fn year_start(&self) -> i32 {
        self.year_start
    }

    pub fn year_end(&self) -> i32 {
        self.year_end
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.year_start..=self.year_end
    }

    /// Whether the final year is still in progress and therefore truncated.
    pub fn is_truncated(&self) -> bool {
        self.year_end == self.today.year()
    }

    /// Days of `year` that belong to the dataset.
    pub fn days_for(&self, year: i32) -> u32 {
        usable_days(year, self.today)
    }

    /// Total number of days `T` spanned by the range.
    ///
    /// Computed as `365 * years + leap years`, minus the not-yet-elapsed part of the
    /// final year when that year is still in progress.
    pub fn total_days(&self) -> usize {
        let years = i64::from(self.year_end - self.year_start + 1);
        let mut total = years * i64::from(DAYS_IN_COMMON_YEAR)
            + leap_years_in_range(self.year_start, self.year_end);
        if self.is_truncated() {
            total -= i64::from(days_in_year(self.year_end) - self.days_for(self.year_end));
        }
        total as usize
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.year_start, self.year_end)
    }
}

/// Shape parameters shared by the three output arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    /// Days `T`.
    pub days: usize,
    /// Locations `P`.
    pub patches: usize,
    /// Region grid cells `F`.
    pub cells: usize,
}

impl GridDimensions {
    pub fn new(days: usize, patches: usize, cells: usize) -> Self {
        Self {
            days,
            patches,
            cells,
        }
    }

    pub fn hours(&self) -> usize {
        self.days * HOURS_PER_DAY as usize
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T={} P={} F={}", self.days, self.patches, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn past() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_total_days_single_years() {
        assert_eq!(TimeRange::new(2020, 2020, past()).unwrap().total_days(), 366);
        assert_eq!(TimeRange::new(2019, 2019, past()).unwrap().total_days(), 365);
    }

    #[test]
    fn test_total_days_multi_year() {
        assert_eq!(TimeRange::new(2019, 2020, past()).unwrap().total_days(), 365 + 366);
        assert_eq!(
            TimeRange::new(1999, 2023, past()).unwrap().total_days(),
            (1999..=2023).map(|y| days_in_year(y) as usize).sum::<usize>()
        );
    }

    #[test]
    fn test_total_days_truncates_current_year() {
        // 2024-06-01 is day 153 of a leap year
        let range = TimeRange::new(2023, 2024, past()).unwrap();
        assert!(range.is_truncated());
        assert_eq!(range.days_for(2024), 153);
        assert_eq!(range.total_days(), 365 + 153);
    }

    #[test]
    fn test_total_days_matches_per_year_sum() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        for start in 1990..=2026 {
            let range = TimeRange::new(start, 2026, today).unwrap();
            let summed: usize = range.years().map(|y| range.days_for(y) as usize).sum();
            assert_eq!(range.total_days(), summed, "start {}", start);
        }
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = TimeRange::new(2021, 2020, past()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedYearRange {
                start: 2021,
                end: 2020
            }
        ));
    }

    #[test]
    fn test_rejects_future_year() {
        let err = TimeRange::new(2020, 2025, past()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::YearInFuture {
                year_end: 2025,
                current_year: 2024
            }
        ));
    }

    #[test]
    fn test_grid_hours() {
        assert_eq!(GridDimensions::new(365, 2, 16).hours(), 8760);
    }
}
