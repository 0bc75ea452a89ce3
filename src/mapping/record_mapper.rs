use crate::calendar::{day_timestamp, hour_timestamp, PhaseEncoder, HOURS_PER_DAY};
use crate::mapping::error::MappingError;
use crate::power::response::{Payload, TimeSeries};
use crate::types::arrays::{daily_channel, hourly_channel, X_PHASE_CHANNELS};
use crate::types::record_kind::Cadence;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use ndarray::{s, Array3};

/// Hourly POWER irradiance is in Wh/m²; the targets are stored in kWh/m².
const WH_PER_KWH: f64 = 1000.0;

/// The rows one year occupies in an array of a given cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSlot {
    pub year: i32,
    /// First row of the year.
    pub offset: usize,
    /// Usable rows of the year (days, or days * 24 for hourly arrays).
    pub rows: usize,
    pub cadence: Cadence,
}

impl YearSlot {
    pub fn daily(year: i32, offset: usize, days: u32) -> Self {
        Self {
            year,
            offset,
            rows: days as usize,
            cadence: Cadence::Daily,
        }
    }

    pub fn hourly(year: i32, offset: usize, days: u32) -> Self {
        Self {
            year,
            offset,
            rows: days as usize * Cadence::Hourly.rows_per_day(),
            cadence: Cadence::Hourly,
        }
    }

    fn end(&self) -> usize {
        self.offset + self.rows
    }

    /// Unix timestamp of the `row`-th row of this year.
    fn timestamp(&self, row: usize) -> i64 {
        match self.cadence {
            Cadence::Daily => day_timestamp(self.year, row),
            Cadence::Hourly => hour_timestamp(self.year, row),
        }
    }

    /// Row within the year addressed by a POWER time key.
    ///
    /// Returns `Ok(None)` for well-formed keys outside this slot (another year, or past the
    /// last usable row of a truncated year).
    fn row_of(&self, key: &str) -> Result<Option<usize>, MappingError> {
        let invalid = || MappingError::InvalidTimeKey {
            key: key.to_string(),
            format: self.cadence.time_key_format(),
        };
        let digits = match self.cadence {
            Cadence::Daily => 8,
            Cadence::Hourly => 10,
        };
        if key.len() != digits || !key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(&key[..8], "%Y%m%d").map_err(|_| invalid())?;
        if date.year() != self.year {
            return Ok(None);
        }
        let day = date.ordinal0() as usize;
        let row = match self.cadence {
            Cadence::Daily => day,
            Cadence::Hourly => {
                let hour: usize = key[8..].parse().map_err(|_| invalid())?;
                if hour >= HOURS_PER_DAY as usize {
                    return Err(invalid());
                }
                day * HOURS_PER_DAY as usize + hour
            }
        };
        Ok((row < self.rows).then_some(row))
    }
}

/// What happened while mapping one payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingSummary {
    /// Cells that received a value from the payload.
    pub rows_written: usize,
    /// Entries whose key fell outside the year slot.
    pub rows_skipped: usize,
    /// Written values that were the API fill value or negative.
    pub fill_values: usize,
    /// Region cells the payload had no series for.
    pub missing_cells: usize,
}

impl MappingSummary {
    pub fn absorb(&mut self, other: MappingSummary) {
        self.rows_written += other.rows_written;
        self.rows_skipped += other.rows_skipped;
        self.fill_values += other.fill_values;
        self.missing_cells += other.missing_cells;
    }
}

/// Writes payloads into the output arrays.
///
/// Every mapping call first prefills the irradiance channels of the slot with the sentinel
/// and writes the phase channels for every row, then overwrites irradiance with the values
/// present in the payload. Rows are located by parsing each time key, so payload order and
/// gaps do not matter.
#[derive(Debug, Clone, Copy)]
pub struct RecordMapper {
    encoder: PhaseEncoder,
    sentinel: f32,
}

impl RecordMapper {
    pub fn new(encoder: PhaseEncoder, sentinel: f32) -> Self {
        Self { encoder, sentinel }
    }

    pub fn encoder(&self) -> &PhaseEncoder {
        &self.encoder
    }

    pub fn sentinel(&self) -> f32 {
        self.sentinel
    }

    /// Maps a regional daily payload into `x`, one region cell per channel.
    ///
    /// Series `i` of the payload goes to channel `i`. Cells without a series keep the
    /// sentinel; surplus series are ignored.
    pub fn map_region_daily(
        &self,
        x: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
        payload: &Payload,
    ) -> Result<MappingSummary, MappingError> {
        check_bounds(x, slot, patch)?;
        let cells = x.dim().2 - X_PHASE_CHANNELS;

        x.slice_mut(s![slot.offset..slot.end(), patch, ..cells])
            .fill(self.sentinel);
        self.write_year_phase(x, slot, patch, cells, cells + 1);

        let mut summary = MappingSummary::default();
        for (cell, series) in payload.series.iter().take(cells).enumerate() {
            summary.absorb(self.write_series(
                x,
                slot,
                patch,
                cell,
                series,
                payload.fill_value,
                |v| v,
            )?);
        }

        if payload.series.len() < cells {
            summary.missing_cells = cells - payload.series.len();
            warn!(
                "Region payload for {} has {} cell series, expected {}; missing cells hold the sentinel",
                slot.year,
                payload.series.len(),
                cells
            );
        } else if payload.series.len() > cells {
            debug!(
                "Region payload for {} has {} cell series, using the first {}",
                slot.year,
                payload.series.len(),
                cells
            );
        }
        Ok(summary)
    }

    /// Maps a point daily payload into `y_daily`.
    pub fn map_point_daily(
        &self,
        y_daily: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
        payload: &Payload,
    ) -> Result<MappingSummary, MappingError> {
        check_bounds(y_daily, slot, patch)?;
        y_daily
            .slice_mut(s![slot.offset..slot.end(), patch, daily_channel::IRRADIANCE])
            .fill(self.sentinel);
        self.write_year_phase(
            y_daily,
            slot,
            patch,
            daily_channel::YEAR_SIN,
            daily_channel::YEAR_COS,
        );

        let mut summary = MappingSummary::default();
        if let Some(series) = payload.series.first() {
            summary = self.write_series(
                y_daily,
                slot,
                patch,
                daily_channel::IRRADIANCE,
                series,
                payload.fill_value,
                |v| v,
            )?;
        }
        Ok(summary)
    }

    /// Maps a point hourly payload into `y_hourly`, converting Wh/m² to kWh/m².
    ///
    /// The API fill value is written unconverted.
    pub fn map_point_hourly(
        &self,
        y_hourly: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
        payload: &Payload,
    ) -> Result<MappingSummary, MappingError> {
        self.prefill_hourly(y_hourly, slot, patch)?;

        let fill_value = payload.fill_value;
        let mut summary = MappingSummary::default();
        if let Some(series) = payload.series.first() {
            summary = self.write_series(
                y_hourly,
                slot,
                patch,
                hourly_channel::IRRADIANCE,
                series,
                fill_value,
                |v| if v == fill_value { v } else { v / WH_PER_KWH },
            )?;
        }
        Ok(summary)
    }

    /// Fills a year of `y_hourly` for which no hourly data exists.
    ///
    /// Irradiance is the sentinel for every hour; the phase channels are computed from the
    /// synthetic hourly timestamps.
    pub fn fill_missing_hourly(
        &self,
        y_hourly: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
    ) -> Result<MappingSummary, MappingError> {
        self.prefill_hourly(y_hourly, slot, patch)?;
        Ok(MappingSummary::default())
    }

    fn prefill_hourly(
        &self,
        y_hourly: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
    ) -> Result<(), MappingError> {
        check_bounds(y_hourly, slot, patch)?;
        y_hourly
            .slice_mut(s![slot.offset..slot.end(), patch, hourly_channel::IRRADIANCE])
            .fill(self.sentinel);
        for row in 0..slot.rows {
            let timestamp = slot.timestamp(row);
            let year = self.encoder.year_phase(timestamp);
            let day = self.encoder.day_phase(timestamp);
            let mut cell = y_hourly.slice_mut(s![slot.offset + row, patch, ..]);
            cell[hourly_channel::YEAR_SIN] = year.sin;
            cell[hourly_channel::YEAR_COS] = year.cos;
            cell[hourly_channel::DAY_SIN] = day.sin;
            cell[hourly_channel::DAY_COS] = day.cos;
        }
        Ok(())
    }

    fn write_year_phase(
        &self,
        dest: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
        sin_channel: usize,
        cos_channel: usize,
    ) {
        for row in 0..slot.rows {
            let phase = self.encoder.year_phase(slot.timestamp(row));
            dest[[slot.offset + row, patch, sin_channel]] = phase.sin;
            dest[[slot.offset + row, patch, cos_channel]] = phase.cos;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_series(
        &self,
        dest: &mut Array3<f32>,
        slot: YearSlot,
        patch: usize,
        channel: usize,
        series: &TimeSeries,
        fill_value: f64,
        convert: impl Fn(f64) -> f64,
    ) -> Result<MappingSummary, MappingError> {
        let mut summary = MappingSummary::default();
        for (key, value) in series {
            let Some(row) = slot.row_of(key)? else {
                summary.rows_skipped += 1;
                continue;
            };
            if *value == fill_value || *value < 0.0 {
                summary.fill_values += 1;
            }
            dest[[slot.offset + row, patch, channel]] = convert(*value) as f32;
            summary.rows_written += 1;
        }
        if summary.rows_skipped > 0 {
            warn!(
                "Skipped {} entries outside {} ({} usable {} rows)",
                summary.rows_skipped, slot.year, slot.rows, slot.cadence
            );
        }
        Ok(summary)
    }
}

fn check_bounds(dest: &Array3<f32>, slot: YearSlot, patch: usize) -> Result<(), MappingError> {
    let (len, patches, _) = dest.dim();
    if slot.end() > len {
        return Err(MappingError::SlotOutOfBounds {
            offset: slot.offset,
            rows: slot.rows,
            len,
        });
    }
    if patch >= patches {
        return Err(MappingError::PatchOutOfBounds { patch, patches });
    }
    Ok(())
}
