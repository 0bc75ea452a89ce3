//! Drives the download of every (year, location) pair and maps the payloads into the
//! output arrays.

use crate::calendar::leap::last_usable_date;
use crate::calendar::PhaseEncoder;
use crate::config::{AssemblySettings, LocationSet};
use crate::error::DatasetError;
use crate::mapping::{MappingSummary, RecordMapper, YearSlot};
use crate::power::request::PowerRequest;
use crate::power::response::Payload;
use crate::power::source::IrradianceSource;
use crate::power::error::PowerApiError;
use crate::types::arrays::DatasetArrays;
use crate::types::geo::{BoundingBox, Location};
use crate::types::record_kind::Cadence;
use crate::types::time_range::GridDimensions;
use chrono::NaiveDate;
use futures_util::{stream, StreamExt, TryStreamExt};
use log::{debug, info, warn};

/// First year the hourly point endpoint has data for.
pub const HOURLY_COVERAGE_START_YEAR: i32 = 2001;

/// Row offsets of the next year to be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeCursor {
    pub t_daily: usize,
    pub t_hourly: usize,
}

impl TimeCursor {
    fn advance(self, days: u32) -> Self {
        Self {
            t_daily: self.t_daily + days as usize,
            t_hourly: self.t_hourly + days as usize * Cadence::Hourly.rows_per_day(),
        }
    }
}

/// Everything a run has produced so far.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyState {
    pub arrays: DatasetArrays,
    pub cursor: TimeCursor,
}

/// Payloads of one location for one year, fetched before any mapping happens.
struct LocationPayloads {
    region: Payload,
    daily: Payload,
    hourly: Option<Payload>,
}

/// Builds the dataset arrays from an [`IrradianceSource`].
#[derive(Debug)]
pub struct DatasetAssembler<S> {
    source: S,
    settings: AssemblySettings,
    locations: LocationSet,
    mapper: RecordMapper,
}

impl<S: IrradianceSource> DatasetAssembler<S> {
    pub fn new(source: S, settings: AssemblySettings, locations: LocationSet) -> Self {
        let mapper = RecordMapper::new(
            PhaseEncoder::new(settings.orbit_period_days()),
            settings.sentinel(),
        );
        Self {
            source,
            settings,
            locations,
            mapper,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(
            self.settings.time_range().total_days(),
            self.locations.len(),
            self.settings.area().cell_count(),
        )
    }

    /// Downloads and maps every year of the range.
    ///
    /// The first failing request aborts the run.
    pub async fn run(&self) -> Result<DatasetArrays, DatasetError> {
        let dims = self.dimensions();
        info!(
            "Assembling {} for {} locations ({})",
            self.settings.time_range(),
            dims.patches,
            dims
        );

        let mut state = AssemblyState {
            arrays: DatasetArrays::zeros(dims),
            cursor: TimeCursor::default(),
        };
        for year in self.settings.time_range().years() {
            state = self.assemble_year(state, year).await?;
        }

        debug!(
            "Finished at t_daily={} t_hourly={}",
            state.cursor.t_daily, state.cursor.t_hourly
        );
        info!("Dataset downloaded");
        Ok(state.arrays)
    }

    /// Fetches and maps all locations of `year`, then advances the cursor past it.
    pub async fn assemble_year(
        &self,
        mut state: AssemblyState,
        year: i32,
    ) -> Result<AssemblyState, DatasetError> {
        let range = self.settings.time_range();
        let days = range.days_for(year);
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            last_usable_date(year, range.today()),
        ) else {
            warn!("Year {} has no usable days, skipping", year);
            return Ok(state);
        };

        let payloads: Vec<LocationPayloads> = stream::iter(self.locations.iter())
            .map(|location| self.fetch_location(location, year, start, end))
            .buffered(self.settings.max_concurrent_requests())
            .try_collect()
            .await?;

        let daily_slot = YearSlot::daily(year, state.cursor.t_daily, days);
        let hourly_slot = YearSlot::hourly(year, state.cursor.t_hourly, days);
        let arrays = &mut state.arrays;
        for (patch, payloads) in payloads.iter().enumerate() {
            let mut summary = MappingSummary::default();
            summary.absorb(self.mapper.map_region_daily(
                &mut arrays.x,
                daily_slot,
                patch,
                &payloads.region,
            )?);
            summary.absorb(self.mapper.map_point_daily(
                &mut arrays.y_daily,
                daily_slot,
                patch,
                &payloads.daily,
            )?);
            match &payloads.hourly {
                Some(hourly) => summary.absorb(self.mapper.map_point_hourly(
                    &mut arrays.y_hourly,
                    hourly_slot,
                    patch,
                    hourly,
                )?),
                None => summary.absorb(self.mapper.fill_missing_hourly(
                    &mut arrays.y_hourly,
                    hourly_slot,
                    patch,
                )?),
            }
            debug!(
                "Patch {} year {}: {} values written, {} fill values, {} skipped",
                patch, year, summary.rows_written, summary.fill_values, summary.rows_skipped
            );
        }

        state.cursor = state.cursor.advance(days);
        debug!(
            "Year {} done, t_daily={} t_hourly={}",
            year, state.cursor.t_daily, state.cursor.t_hourly
        );
        Ok(state)
    }

    async fn fetch_location(
        &self,
        location: &Location,
        year: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<LocationPayloads, PowerApiError> {
        let area = BoundingBox::around(location.coordinate, self.settings.area());
        info!("{} (year {})", location.name, year);
        info!("Target: {}", location.coordinate);
        info!("Area: {}", area);

        let region = self
            .source
            .fetch(&PowerRequest::region_daily(start, end, area))
            .await?;
        let daily = self
            .source
            .fetch(&PowerRequest::point_daily(start, end, location.coordinate))
            .await?;
        let hourly = if year >= HOURLY_COVERAGE_START_YEAR {
            Some(
                self.source
                    .fetch(&PowerRequest::point_hourly(start, end, location.coordinate))
                    .await?,
            )
        } else {
            debug!(
                "No hourly coverage before {}, synthesizing {} for {}",
                HOURLY_COVERAGE_START_YEAR, year, location.name
            );
            None
        };

        Ok(LocationPayloads {
            region,
            daily,
            hourly,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::response::TimeSeries;
    use crate::types::geo::{AreaSpec, LatLon};
    use crate::types::record_kind::RecordKind;
    use crate::types::time_range::TimeRange;
    use chrono::Datelike;
    use std::sync::Mutex;

    /// Answers every request with one entry per usable day or hour, recording the calls.
    struct RecordingSource {
        calls: Mutex<Vec<(RecordKind, i32)>>,
    }

    impl RecordingSource {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl IrradianceSource for RecordingSource {
        async fn fetch(&self, request: &PowerRequest) -> Result<Payload, PowerApiError> {
            self.calls.lock().unwrap().push((request.kind, request.year));
            let mut series = TimeSeries::new();
            let mut date = request.start;
            while date <= request.end {
                match request.kind {
                    RecordKind::PointHourly => {
                        for hour in 0..24 {
                            series.insert(format!("{}{:02}", date.format("%Y%m%d"), hour), 1000.0);
                        }
                    }
                    _ => {
                        series.insert(date.format("%Y%m%d").to_string(), date.ordinal() as f64);
                    }
                }
                date = date.succ_opt().unwrap();
            }
            Ok(match request.kind {
                RecordKind::RegionDaily => Payload::region(vec![series; 2]),
                _ => Payload::point(series),
            })
        }
    }

    fn assembler(start: i32, end: i32, today: NaiveDate) -> DatasetAssembler<RecordingSource> {
        let settings = AssemblySettings::builder()
            .time_range(TimeRange::new(start, end, today).unwrap())
            .area(AreaSpec::new(1.0, 0.5))
            .build()
            .unwrap();
        let locations = LocationSet::new(vec![Location::new("A", LatLon(10.0, 20.0))]).unwrap();
        DatasetAssembler::new(RecordingSource::new(), settings, locations)
    }

    #[test]
    fn test_cursor_advance() {
        let cursor = TimeCursor::default().advance(366).advance(365);
        assert_eq!(cursor.t_daily, 731);
        assert_eq!(cursor.t_hourly, 731 * 24);
    }

    #[tokio::test]
    async fn test_years_are_laid_out_back_to_back() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let assembler = assembler(2000, 2001, today);
        let arrays = assembler.run().await.unwrap();

        assert_eq!(arrays.y_daily.dim(), (366 + 365, 1, 3));
        // ordinal of 1 January 2001 lands right after 31 December 2000
        assert_eq!(arrays.y_daily[[365, 0, 0]], 366.0);
        assert_eq!(arrays.y_daily[[366, 0, 0]], 1.0);
        assert_eq!(arrays.x[[366, 0, 1]], 1.0);

        // 2000 predates hourly coverage
        assert!(arrays.y_hourly.slice(ndarray::s![..366 * 24, 0, 0]).iter().all(|v| *v == -1.0));
        assert!(arrays.y_hourly.slice(ndarray::s![366 * 24.., 0, 0]).iter().all(|v| *v == 1.0));

        let calls = assembler.source().calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (RecordKind::RegionDaily, 2000),
                (RecordKind::PointDaily, 2000),
                (RecordKind::RegionDaily, 2001),
                (RecordKind::PointDaily, 2001),
                (RecordKind::PointHourly, 2001),
            ]
        );
    }

    #[tokio::test]
    async fn test_current_year_is_truncated() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let assembler = assembler(2023, 2024, today);
        let arrays = assembler.run().await.unwrap();

        // 1 March is day 61 of a leap year
        assert_eq!(arrays.y_daily.dim().0, 365 + 61);
        assert_eq!(arrays.y_hourly.dim().0, (365 + 61) * 24);
        assert_eq!(arrays.y_daily[[365 + 60, 0, 0]], 61.0);
    }
}
