use chrono::{Datelike, NaiveDate};

/// Number of days in a common year.
pub const DAYS_IN_COMMON_YEAR: u32 = 365;

/// Number of hours in a day, used to size the hourly arrays.
pub const HOURS_PER_DAY: u32 = 24;

/// Gregorian leap-year rule: divisible by 4, except centuries not divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year` (365 or 366).
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        DAYS_IN_COMMON_YEAR + 1
    } else {
        DAYS_IN_COMMON_YEAR
    }
}

/// Count of leap years in `1..=year` (extended to non-positive years with floor division).
fn leap_years_through(year: i64) -> i64 {
    year.div_euclid(4) - year.div_euclid(100) + year.div_euclid(400)
}

/// Count of leap years in the inclusive range `[start, end]`.
///
/// Uses the prefix-count identity `count(end) - count(start - 1)`, so the cost is
/// constant regardless of the range length. Returns 0 for an empty range (`start > end`).
///
/// # Examples
///
/// ```
/// use irradiance_grid::calendar::leap_years_in_range;
///
/// assert_eq!(leap_years_in_range(2019, 2021), 1);
/// assert_eq!(leap_years_in_range(1900, 1900), 0);
/// assert_eq!(leap_years_in_range(2000, 2000), 1);
/// ```
pub fn leap_years_in_range(start: i32, end: i32) -> i64 {
    if start > end {
        return 0;
    }
    leap_years_through(i64::from(end)) - leap_years_through(i64::from(start) - 1)
}

/// Days of `year` that have elapsed as of `today`, counting `today` itself.
///
/// For any year before `today`'s year this is the full year. For the current year the
/// days still remaining until 31 December are subtracted, which leaves today's ordinal.
/// Years after `today` have no usable days.
pub fn usable_days(year: i32, today: NaiveDate) -> u32 {
    match year.cmp(&today.year()) {
        std::cmp::Ordering::Less => days_in_year(year),
        std::cmp::Ordering::Equal => {
            let remaining = days_in_year(year) - today.ordinal();
            days_in_year(year) - remaining
        }
        std::cmp::Ordering::Greater => 0,
    }
}

/// Last date of `year` that is part of the dataset as of `today`.
pub(crate) fn last_usable_date(year: i32, today: NaiveDate) -> Option<NaiveDate> {
    if year == today.year() {
        Some(today)
    } else {
        NaiveDate::from_ymd_opt(year, 12, 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_leap_count(start: i32, end: i32) -> i64 {
        (start..=end).filter(|y| is_leap_year(*y)).count() as i64
    }

    #[test]
    fn test_leap_rule() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1600));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2021));
    }

    #[test]
    fn test_leap_years_in_range_matches_naive_count() {
        for start in 1580..1720 {
            for end in start..start + 130 {
                assert_eq!(
                    leap_years_in_range(start, end),
                    naive_leap_count(start, end),
                    "range {}..={}",
                    start,
                    end
                );
            }
        }
        for start in 1890..2110 {
            for end in start..2110 {
                assert_eq!(leap_years_in_range(start, end), naive_leap_count(start, end));
            }
        }
    }

    #[test]
    fn test_leap_years_in_range_around_zero() {
        assert_eq!(leap_years_in_range(-4, 4), naive_leap_count(-4, 4));
        assert_eq!(leap_years_in_range(-401, -1), naive_leap_count(-401, -1));
    }

    #[test]
    fn test_leap_years_in_empty_range() {
        assert_eq!(leap_years_in_range(2021, 2020), 0);
    }

    #[test]
    fn test_days_in_year_follows_leap_rule() {
        for year in 1800..2200 {
            let expected = if is_leap_year(year) { 366 } else { 365 };
            assert_eq!(days_in_year(year), expected, "year {}", year);
        }
    }

    #[test]
    fn test_usable_days_past_and_future_years() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(usable_days(2020, today), 366);
        assert_eq!(usable_days(2023, today), 365);
        assert_eq!(usable_days(2025, today), 0);
    }

    #[test]
    fn test_usable_days_current_year_is_truncated() {
        // 31 (Jan) + 29 (Feb) + 1
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(usable_days(2024, today), 61);

        let new_year = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(usable_days(2021, new_year), 1);

        let new_years_eve = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        assert_eq!(usable_days(2021, new_years_eve), 365);
    }

    #[test]
    fn test_last_usable_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(last_usable_date(2024, today), Some(today));
        assert_eq!(
            last_usable_date(2022, today),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
    }
}
